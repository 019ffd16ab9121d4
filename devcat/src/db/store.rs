//! The store seam between request handlers and persistence.
//!
//! Handlers only see `Arc<dyn Store>`. [`PgStore`] runs the repositories against a pool;
//! [`MemoryStore`] keeps everything in process, which is what development mode and the HTTP
//! tests use. Both assign ids in insertion order and list in ascending id order.

use crate::config::DatabaseConfig;
use crate::db::{
    errors::{DbError, Result},
    handlers::{Clients, Products, Repository, Users, products::ProductFilter, users::UserFilter},
    models::{
        clients::{ClientCreateDBRequest, ClientDBResponse},
        products::{ProductCreateDBRequest, ProductDBResponse},
        users::{UserCreateDBRequest, UserDBResponse},
    },
};
use crate::types::{ClientId, ProductId, UserId};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_client(&self, id: ClientId) -> Result<Option<ClientDBResponse>>;

    async fn find_client_by_email(&self, email: &str) -> Result<Option<ClientDBResponse>>;

    /// Fails with [`DbError::UniqueViolation`] if the email is taken
    async fn create_client(&self, request: &ClientCreateDBRequest) -> Result<ClientDBResponse>;

    async fn list_users(&self, client_id: ClientId) -> Result<Vec<UserDBResponse>>;

    async fn find_user(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Fails with [`DbError::ForeignKeyViolation`] if the owning client does not exist
    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    async fn delete_user(&self, id: UserId) -> Result<bool>;

    /// Products `skip..skip + limit` in ascending id order
    async fn list_products(&self, skip: i64, limit: i64) -> Result<Vec<ProductDBResponse>>;

    async fn find_product(&self, id: ProductId) -> Result<Option<ProductDBResponse>>;

    async fn create_product(&self, request: &ProductCreateDBRequest) -> Result<ProductDBResponse>;

    async fn count_products(&self) -> Result<i64>;
}

/// Build the store named by the configuration. The pool is returned as well so the
/// application can close it on shutdown.
pub async fn create_store(config: &DatabaseConfig) -> anyhow::Result<(Arc<dyn Store>, Option<PgPool>)> {
    match config {
        DatabaseConfig::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        DatabaseConfig::External { url, pool: settings } => {
            info!("Using external database");
            let pool = super::connect(url, settings).await?;
            crate::migrator().run(&pool).await?;
            Ok((Arc::new(PgStore::new(pool.clone())), Some(pool)))
        }
    }
}

/// PostgreSQL-backed store. Mutations run in their own transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_client(&self, id: ClientId) -> Result<Option<ClientDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Clients::new(&mut conn).get_by_id(id).await
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<ClientDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Clients::new(&mut conn).get_by_email(email).await
    }

    async fn create_client(&self, request: &ClientCreateDBRequest) -> Result<ClientDBResponse> {
        let mut tx = self.pool.begin().await?;
        let client = Clients::new(&mut tx).create(request).await?;
        tx.commit().await?;
        Ok(client)
    }

    async fn list_users(&self, client_id: ClientId) -> Result<Vec<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).list(&UserFilter::new(client_id)).await
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_by_id(id).await
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut tx = self.pool.begin().await?;
        let user = Users::new(&mut tx).create(request).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = Users::new(&mut tx).delete(id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn list_products(&self, skip: i64, limit: i64) -> Result<Vec<ProductDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Products::new(&mut conn).list(&ProductFilter::new(skip, limit)).await
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<ProductDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Products::new(&mut conn).get_by_id(id).await
    }

    async fn create_product(&self, request: &ProductCreateDBRequest) -> Result<ProductDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Products::new(&mut conn).create(request).await
    }

    async fn count_products(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        Products::new(&mut conn).count().await
    }
}

#[derive(Default)]
struct Tables {
    clients: BTreeMap<ClientId, ClientDBResponse>,
    users: BTreeMap<UserId, UserDBResponse>,
    products: BTreeMap<ProductId, ProductDBResponse>,
    next_client_id: ClientId,
    next_user_id: UserId,
    next_product_id: ProductId,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Process-local store with the same constraints as the PostgreSQL schema: unique client
/// email, users must reference an existing client.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_client(&self, id: ClientId) -> Result<Option<ClientDBResponse>> {
        Ok(self.tables.read().await.clients.get(&id).cloned())
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<ClientDBResponse>> {
        let tables = self.tables.read().await;
        Ok(tables.clients.values().find(|c| c.email == email).cloned())
    }

    async fn create_client(&self, request: &ClientCreateDBRequest) -> Result<ClientDBResponse> {
        let mut tables = self.tables.write().await;
        if tables.clients.values().any(|c| c.email == request.email) {
            return Err(DbError::UniqueViolation {
                constraint: Some("clients_email_key".to_string()),
                table: Some("clients".to_string()),
                message: format!("email {} already exists", request.email),
            });
        }

        let id = next_id(&mut tables.next_client_id);
        let client = ClientDBResponse {
            id,
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            name: request.name.clone(),
            roles: request.roles.clone(),
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        };
        tables.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn list_users(&self, client_id: ClientId) -> Result<Vec<UserDBResponse>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|u| u.client_id == client_id).cloned().collect())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut tables = self.tables.write().await;
        if !tables.clients.contains_key(&request.client_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("users_client_id_fkey".to_string()),
                table: Some("users".to_string()),
                message: format!("client {} does not exist", request.client_id),
            });
        }

        let id = next_id(&mut tables.next_user_id);
        let user = UserDBResponse::from_request(id, request.clone());
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }

    async fn list_products(&self, skip: i64, limit: i64) -> Result<Vec<ProductDBResponse>> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(tables.products.values().skip(skip).take(limit).cloned().collect())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<ProductDBResponse>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, request: &ProductCreateDBRequest) -> Result<ProductDBResponse> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_product_id);
        let product = ProductDBResponse::from_request(id, request.clone());
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn count_products(&self) -> Result<i64> {
        Ok(self.tables.read().await.products.len() as i64)
    }
}
