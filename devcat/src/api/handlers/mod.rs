//! HTTP request handlers for all API endpoints.
//!
//! Each handler runs the same pipeline: authenticate (via the
//! [`CurrentClient`](crate::auth::current_user::CurrentClient) extractor), validate path and
//! query input, resolve the referenced records, authorize, then read through the cache or
//! write through the store and invalidate.
//!
//! - [`auth`]: `POST /api/login_check`
//! - [`client_users`]: users scoped to a client
//! - [`products`]: the read-only catalog
//!
//! Handlers return [`crate::errors::Error`], which renders as a JSON error body.

pub mod auth;
pub mod client_users;
pub mod products;
