//! Data access layer.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │    Store    │  (store::Store - PgStore or MemoryStore)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (handlers - one per table, borrow a connection)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! - [`store`]: the [`Store`](store::Store) trait handlers depend on, with PostgreSQL and
//!   in-memory implementations
//! - [`handlers`]: repository implementations for each table
//! - [`models`]: records accepted and returned by the store
//! - [`errors`]: store error categorization

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;

use crate::config::PoolSettings;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Open a connection pool with the configured limits. Zero timeouts mean "never".
pub async fn connect(url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let non_zero = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(non_zero(settings.idle_timeout_secs))
        .max_lifetime(non_zero(settings.max_lifetime_secs))
        .connect(url)
        .await
}
