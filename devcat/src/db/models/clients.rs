//! Store models for clients.

use crate::auth::permissions::effective_roles;
use crate::types::ClientId;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Account state. Only `Active` clients may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientStatus {
    Active,
    Inactive,
    Suspended,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] = [ClientStatus::Active, ClientStatus::Inactive, ClientStatus::Suspended];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "ACTIVE",
            ClientStatus::Inactive => "INACTIVE",
            ClientStatus::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown client status {s:?}"))
    }
}

/// Store request for creating a client
#[derive(Clone)]
pub struct ClientCreateDBRequest {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub roles: Vec<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store response for a client
#[derive(Clone)]
pub struct ClientDBResponse {
    pub id: ClientId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// Roles as stored; see [`ClientDBResponse::effective_roles`]
    pub roles: Vec<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientDBResponse {
    pub fn effective_roles(&self) -> BTreeSet<String> {
        effective_roles(&self.roles)
    }
}

// The hash is omitted so records can be logged freely.
impl fmt::Debug for ClientDBResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientDBResponse")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("roles", &self.roles)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ClientCreateDBRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCreateDBRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("roles", &self.roles)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_column_value() {
        for status in ClientStatus::ALL {
            assert_eq!(status.as_str().parse::<ClientStatus>().unwrap(), status);
        }
        assert!("active".parse::<ClientStatus>().is_err());
    }

    #[test]
    fn debug_output_never_contains_the_hash() {
        let client = ClientDBResponse {
            id: 1,
            email: "demo@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            name: "Demo Client".to_string(),
            roles: vec!["ROLE_CLIENT".to_string()],
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let rendered = format!("{client:?}");
        assert!(rendered.contains("demo@example.com"));
        assert!(!rendered.contains("argon2"));
        assert!(client.effective_roles().contains("ROLE_USER"));
    }
}
