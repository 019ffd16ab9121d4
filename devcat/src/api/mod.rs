//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/api/login_check`): exchange credentials for a bearer token
//! - **Products** (`/api/products/*`): the paginated, read-only device catalog
//! - **Client users** (`/api/clients/{clientId}/users/*`): users owned by a client
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with `utoipa` annotations. The document is served at
//! `/api/doc.json` and rendered with Scalar at `/api/doc`.

pub mod handlers;
pub mod models;
