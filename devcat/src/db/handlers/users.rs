//! Database repository for client users.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::{ClientId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing users: always scoped to one client
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub client_id: ClientId,
}

impl UserFilter {
    pub fn new(client_id: ClientId) -> Self {
        Self { client_id }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(client_id = request.client_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (client_id, first_name, last_name, phone_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.client_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.phone_number)
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), fields(client_id = filter.client_id), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE client_id = $1 ORDER BY id ASC")
            .bind(filter.client_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::db::handlers::Clients;
    use crate::db::models::clients::{ClientCreateDBRequest, ClientStatus};
    use chrono::Utc;
    use sqlx::PgPool;

    async fn create_client(conn: &mut PgConnection, email: &str) -> ClientId {
        Clients::new(conn)
            .create(&ClientCreateDBRequest {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                name: "Test Client".to_string(),
                roles: vec!["ROLE_CLIENT".to_string()],
                status: ClientStatus::Active,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap()
            .id
    }

    fn user_for(client_id: ClientId, first_name: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            client_id,
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            phone_number: Some("+1 555 0100".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_list_is_scoped_to_client(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let a = create_client(&mut conn, "a@example.com").await;
        let b = create_client(&mut conn, "b@example.com").await;

        let mut repo = Users::new(&mut conn);
        let jane = repo.create(&user_for(a, "Jane")).await.unwrap();
        repo.create(&user_for(b, "John")).await.unwrap();
        let jim = repo.create(&user_for(a, "Jim")).await.unwrap();

        let listed = repo.list(&UserFilter::new(a)).await.unwrap();
        assert_eq!(listed.iter().map(|u| u.id).collect::<Vec<_>>(), vec![jane.id, jim.id]);
        assert_eq!(repo.get_by_id(jane.id).await.unwrap(), Some(jane));
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_delete_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let a = create_client(&mut conn, "a@example.com").await;

        let mut repo = Users::new(&mut conn);
        let user = repo.create(&user_for(a, "Jane")).await.unwrap();

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.get_by_id(user.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_user_requires_existing_client(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = Users::new(&mut conn).create(&user_for(4242, "Jane")).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
