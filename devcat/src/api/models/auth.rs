//! API request/response models for authentication.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credentials posted to `/api/login_check`
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// The client's email address
    #[schema(example = "demo@example.com")]
    pub username: String,
    #[schema(example = "password")]
    pub password: String,
}

// The password is omitted so request bodies can be logged freely.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_password() {
        let request = LoginRequest {
            username: "demo@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("demo@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
