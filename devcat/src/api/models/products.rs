//! API response models for catalog products.

use crate::db::models::products::ProductDBResponse;
use crate::types::ProductId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog entry. `price` is rendered as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "999.00")]
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
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

impl From<ProductDBResponse> for ProductResponse {
    fn from(db: ProductDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            brand: db.brand,
            model: db.model,
            description: db.description,
            price: db.price,
            currency: db.currency,
            release_date: db.release_date,
            stock_status: db.stock_status,
            os: db.os,
            color: db.color,
            screen_size: db.screen_size,
            resolution: db.resolution,
            battery: db.battery,
            camera: db.camera,
            weight: db.weight,
            dimensions: db.dimensions,
            image_url: db.image_url,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
