//! Store models for catalog products.

use crate::types::ProductId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Store request for inserting a product. Products are only created by seeding.
#[derive(Debug, Clone)]
pub struct ProductCreateDBRequest {
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub stock_status: Option<String>,
    pub os: Option<String>,
    pub color: Option<String>,
    pub screen_size: Option<String>,
    pub resolution: Option<String>,
    pub battery: Option<String>,
    pub camera: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store response for a product
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProductDBResponse {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub stock_status: Option<String>,
    pub os: Option<String>,
    pub color: Option<String>,
    pub screen_size: Option<String>,
    pub resolution: Option<String>,
    pub battery: Option<String>,
    pub camera: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDBResponse {
    /// Attach a store-assigned id to a create request
    pub fn from_request(id: ProductId, request: ProductCreateDBRequest) -> Self {
        Self {
            id,
            name: request.name,
            brand: request.brand,
            model: request.model,
            description: request.description,
            price: request.price,
            currency: request.currency,
            release_date: request.release_date,
            stock_status: request.stock_status,
            os: request.os,
            color: request.color,
            screen_size: request.screen_size,
            resolution: request.resolution,
            battery: request.battery,
            camera: request.camera,
            weight: request.weight,
            dimensions: request.dimensions,
            image_url: request.image_url,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}
