//! PostgreSQL repositories, one per table.
//!
//! [`Users`] and [`Products`] implement the [`Repository`] trait (create, get by id, list).
//! [`Clients`] only exposes the lookups the API needs plus seeding.

pub mod clients;
pub mod products;
pub mod repository;
pub mod users;

pub use clients::Clients;
pub use products::Products;
pub use repository::Repository;
pub use users::Users;
