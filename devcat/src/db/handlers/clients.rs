//! Database repository for clients.

use crate::db::{
    errors::{DbError, Result},
    models::clients::{ClientCreateDBRequest, ClientDBResponse, ClientStatus},
};
use crate::types::ClientId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

#[derive(FromRow)]
struct Client {
    id: ClientId,
    email: String,
    password: String,
    name: String,
    roles: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<Client> for ClientDBResponse {
    type Error = DbError;

    fn try_from(row: Client) -> Result<Self> {
        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password,
            name: row.name,
            roles: row.roles,
            status: row.status.parse::<ClientStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct Clients<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Clients<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    pub async fn create(&mut self, request: &ClientCreateDBRequest) -> Result<ClientDBResponse> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (email, password, name, roles, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&request.name)
        .bind(&request.roles)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&mut *self.db)
        .await?;

        client.try_into()
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: ClientId) -> Result<Option<ClientDBResponse>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        client.map(ClientDBResponse::try_from).transpose()
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<ClientDBResponse>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        client.map(ClientDBResponse::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::users::UserCreateDBRequest;
    use crate::db::handlers::{Repository, Users, users::UserFilter};
    use sqlx::PgPool;

    fn demo_client() -> ClientCreateDBRequest {
        ClientCreateDBRequest {
            email: "demo@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Demo Client".to_string(),
            roles: vec!["ROLE_CLIENT".to_string()],
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_create_and_lookup_client(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Clients::new(&mut conn);

        let created = repo.create(&demo_client()).await.unwrap();
        assert_eq!(created.status, ClientStatus::Active);
        assert_eq!(created.roles, vec!["ROLE_CLIENT".to_string()]);

        let by_email = repo.get_by_email("demo@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert!(repo.get_by_id(created.id + 1000).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_duplicate_email_is_a_unique_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Clients::new(&mut conn);

        repo.create(&demo_client()).await.unwrap();
        let err = repo.create(&demo_client()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_deleting_client_removes_its_users(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let client = Clients::new(&mut conn).create(&demo_client()).await.unwrap();

        let mut users = Users::new(&mut conn);
        users
            .create(&UserCreateDBRequest {
                client_id: client.id,
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                phone_number: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        // Clients are never deleted through the API; the schema still guarantees the cascade
        let deleted = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        assert_eq!(deleted.rows_affected(), 1);
        let remaining = Users::new(&mut conn).list(&UserFilter::new(client.id)).await.unwrap();
        assert!(remaining.is_empty());
    }
}
