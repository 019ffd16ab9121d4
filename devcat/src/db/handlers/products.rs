//! Database repository for catalog products.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::products::{ProductCreateDBRequest, ProductDBResponse},
};
use crate::types::ProductId;
use sqlx::PgConnection;
use tracing::instrument;

/// Offset window over the catalog in id order
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub skip: i64,
    pub limit: i64,
}

impl ProductFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Products<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Products<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *self.db)
            .await?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Products<'c> {
    type CreateRequest = ProductCreateDBRequest;
    type Response = ProductDBResponse;
    type Id = ProductId;
    type Filter = ProductFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let product = sqlx::query_as::<_, ProductDBResponse>(
            r#"
            INSERT INTO products (
                name, brand, model, description, price, currency, release_date, stock_status, os, color,
                screen_size, resolution, battery, camera, weight, dimensions, image_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.brand)
        .bind(&request.model)
        .bind(&request.description)
        .bind(request.price)
        .bind(&request.currency)
        .bind(request.release_date)
        .bind(&request.stock_status)
        .bind(&request.os)
        .bind(&request.color)
        .bind(&request.screen_size)
        .bind(&request.resolution)
        .bind(&request.battery)
        .bind(&request.camera)
        .bind(&request.weight)
        .bind(&request.dimensions)
        .bind(&request.image_url)
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let product = sqlx::query_as::<_, ProductDBResponse>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self, filter), fields(skip = filter.skip, limit = filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let products = sqlx::query_as::<_, ProductDBResponse>("SELECT * FROM products ORDER BY id ASC LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(products)
    }
}
