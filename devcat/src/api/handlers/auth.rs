//! Login endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{debug, info};

use crate::{
    AppState,
    api::models::auth::{LoginRequest, LoginResponse},
    auth::{
        password::{self, Argon2Params},
        session,
    },
    db::models::clients::ClientStatus,
    errors::{Error, Result},
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid credentials.".to_string()),
    }
}

/// Exchange a client's email and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/login_check",
    request_body = LoginRequest,
    tag = "authentication",
    summary = "Log in",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body", body = crate::errors::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login_check(
    State(state): State<AppState>,
    request: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = request?;

    let client = state.store.find_client_by_email(request.username.trim()).await?;

    // Unknown emails still pay for one Argon2 hash so response time does not reveal accounts
    let password = request.password;
    let hash = client.as_ref().map(|c| c.password_hash.clone());
    let params = Argon2Params::from(&state.config.auth.password);
    let is_valid = tokio::task::spawn_blocking(move || password::verify_or_equal_work(&password, hash.as_deref(), params))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    let Some(client) = client else {
        debug!("Login attempt for unknown email");
        return Err(invalid_credentials());
    };
    if !is_valid {
        debug!(client_id = client.id, "Password mismatch");
        return Err(invalid_credentials());
    }
    if client.status != ClientStatus::Active {
        debug!(client_id = client.id, status = %client.status, "Login refused for inactive client");
        return Err(invalid_credentials());
    }

    let token = session::create_session_token(&client, &state.config)?;
    info!(client_id = client.id, "Client logged in");

    Ok(Json(LoginResponse { token }))
}
