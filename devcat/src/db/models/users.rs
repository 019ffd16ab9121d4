//! Store models for client users.

use crate::types::{ClientId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Store request for creating a user under a client
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub client_id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store response for a user
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub client_id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDBResponse {
    /// Attach a store-assigned id to a create request
    pub fn from_request(id: UserId, request: UserCreateDBRequest) -> Self {
        Self {
            id,
            client_id: request.client_id,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}
