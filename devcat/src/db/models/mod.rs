//! Store records.
//!
//! These structs are what the [`Store`](crate::db::store::Store) accepts and returns. They are
//! distinct from the API models so the stored shape (password hash, owning client id) never
//! leaks into a response by accident.
//!
//! - [`clients`]: API consumers that authenticate and own users
//! - [`users`]: Sub-users scoped to one client
//! - [`products`]: Read-only catalog entries

pub mod clients;
pub mod products;
pub mod users;
