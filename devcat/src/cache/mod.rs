//! Response caching for the listing endpoints.
//!
//! Listings are served cache-aside through [`TagCache::get_or_compute`]. Every entry carries a
//! set of tags, and [`TagCache::invalidate`] makes every entry under any of the given tags a
//! miss. Keys and tags are built with the helpers below so handlers never format them by hand.
//!
//! | Listing | Key | Tags |
//! |---|---|---|
//! | products | `listProducts-{page}-{limit}` | `productsCache` |
//! | client users | `listUsers-{clientId}` | `clientUsersCache`, `clientUsers-{clientId}` |

mod tagged;

pub use tagged::TagCache;

use crate::api::models::{products::ProductResponse, users::UserResponse};
use crate::config::CacheConfig;
use crate::types::ClientId;

pub const PRODUCTS_TAG: &str = "productsCache";
/// Covers every client's user listing
pub const CLIENT_USERS_TAG: &str = "clientUsersCache";

pub fn client_users_tag(client_id: ClientId) -> String {
    format!("clientUsers-{client_id}")
}

pub fn product_list_key(page: u32, limit: u32) -> String {
    format!("listProducts-{page}-{limit}")
}

pub fn user_list_key(client_id: ClientId) -> String {
    format!("listUsers-{client_id}")
}

/// Tags stored on a client's user listing: both the coarse and the per-client tag, so either
/// invalidation strategy reaches it.
pub fn user_list_tags(client_id: ClientId) -> Vec<String> {
    vec![CLIENT_USERS_TAG.to_string(), client_users_tag(client_id)]
}

/// The caches held in application state.
#[derive(Clone)]
pub struct Caches {
    pub products: TagCache<Vec<ProductResponse>>,
    pub users: TagCache<Vec<UserResponse>>,
    per_client_user_tags: bool,
}

impl Caches {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            products: TagCache::new("products", config.ttl, config.max_capacity),
            users: TagCache::new("users", config.ttl, config.max_capacity),
            per_client_user_tags: config.per_client_user_tags,
        }
    }

    /// Drop cached user listings after a user of `client_id` was created or deleted.
    pub fn invalidate_client_users(&self, client_id: ClientId) {
        if self.per_client_user_tags {
            self.users.invalidate(&[client_users_tag(client_id)]);
        } else {
            self.users.invalidate(&[CLIENT_USERS_TAG.to_string()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config(per_client_user_tags: bool) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(60),
            max_capacity: 100,
            per_client_user_tags,
        }
    }

    async fn list_users(caches: &Caches, client_id: ClientId, calls: &AtomicUsize) -> Vec<UserResponse> {
        caches
            .users
            .get_or_compute(&user_list_key(client_id), &user_list_tags(client_id), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::convert::Infallible>(Vec::new())
            })
            .await
            .unwrap()
    }

    #[test]
    fn keys_and_tags_are_deterministic() {
        assert_eq!(product_list_key(2, 3), "listProducts-2-3");
        assert_eq!(user_list_key(17), "listUsers-17");
        assert_eq!(user_list_tags(17), vec!["clientUsersCache", "clientUsers-17"]);
    }

    #[test_log::test(tokio::test)]
    async fn per_client_invalidation_leaves_other_clients_cached() {
        let caches = Caches::new(&config(true));
        let (a, b) = (&AtomicUsize::new(0), &AtomicUsize::new(0));

        list_users(&caches, 1, a).await;
        list_users(&caches, 2, b).await;
        caches.invalidate_client_users(1);
        list_users(&caches, 1, a).await;
        list_users(&caches, 2, b).await;

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test_log::test(tokio::test)]
    async fn coarse_invalidation_drops_every_client() {
        let caches = Caches::new(&config(false));
        let (a, b) = (&AtomicUsize::new(0), &AtomicUsize::new(0));

        list_users(&caches, 1, a).await;
        list_users(&caches, 2, b).await;
        caches.invalidate_client_users(1);
        list_users(&caches, 1, a).await;
        list_users(&caches, 2, b).await;

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }
}
