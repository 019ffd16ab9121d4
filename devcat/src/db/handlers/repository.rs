//! Base repository trait for database operations.

use crate::db::errors::Result;

/// A repository is the data access layer for one PostgreSQL table. Implementations borrow a
/// connection (or transaction) for their lifetime, so callers decide the transaction scope.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities matching the filter, in ascending id order
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;
}
