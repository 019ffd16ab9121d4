//! API request and response data models.
//!
//! These types define the public JSON contract and are kept apart from the store models in
//! [`crate::db::models`], so storage and wire formats can change independently. Field names
//! are camelCase on the wire.
//!
//! - [`auth`]: login payloads
//! - [`pagination`]: `page`/`limit` query parameters and their validation
//! - [`products`]: catalog entries
//! - [`users`]: client users and the create payload

pub mod auth;
pub mod pagination;
pub mod products;
pub mod users;
