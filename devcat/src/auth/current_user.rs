//! The authenticated principal and its extractor.

use crate::{
    AppState,
    auth::{password::credential_digest, session},
    db::models::clients::ClientStatus,
    errors::{Error, Result},
    types::ClientId,
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// The client making the request, resolved from its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentClient {
    pub id: ClientId,
    pub email: String,
    pub roles: BTreeSet<String>,
}

fn unauthenticated(message: &str) -> Error {
    Error::Unauthenticated {
        message: Some(message.to_string()),
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Result<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthenticated("JWT Token not found"))?
        .to_str()
        .map_err(|_| unauthenticated("Invalid authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthenticated("Invalid authorization header"))
}

impl FromRequestParts<AppState> for CurrentClient {
    type Rejection = Error;

    /// Verifies the token, then re-reads the client so deleted, deactivated, or re-keyed
    /// accounts lose access immediately.
    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        let claims = session::verify_session_token(token, &state.config)?;

        let client = state
            .store
            .find_client(claims.sub)
            .await?
            .ok_or_else(|| unauthenticated("Session is no longer valid"))?;

        if client.status != ClientStatus::Active {
            debug!(client_id = client.id, status = %client.status, "Rejecting token for inactive client");
            return Err(unauthenticated("Session is no longer valid"));
        }
        if credential_digest(&client.password_hash) != claims.cred {
            debug!(client_id = client.id, "Rejecting token issued for a previous credential");
            return Err(unauthenticated("Session is no longer valid"));
        }

        debug!(client_id = client.id, "Authenticated client");
        Ok(CurrentClient {
            id: client.id,
            roles: client.effective_roles(),
            email: client.email,
        })
    }
}
