//! Users scoped to a client: `/api/clients/{clientId}/users[/{userId}]`.
//!
//! Checks run in a fixed order so each failure has a predictable status: authentication (401,
//! in the extractor), path id syntax (400), client existence (404), client scope (403), user
//! existence (404), user ownership (403). Reads and creates are only scope-gated when
//! `auth.enforce_ownership_on_reads` is set; deletes always are.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;

use crate::{
    AppState,
    api::models::users::{UserCreate, UserResponse},
    auth::{
        current_user::CurrentClient,
        permissions::{authorize_client_scope, authorize_owner_access},
    },
    cache::{user_list_key, user_list_tags},
    db::models::users::{UserCreateDBRequest, UserDBResponse},
    errors::{Error, Result},
    types::{ClientId, Operation, Resource, UserId, parse_path_id},
};

fn ownership_enforced(state: &AppState, action: Operation) -> bool {
    matches!(action, Operation::DeleteOwn) || state.config.auth.enforce_ownership_on_reads
}

/// Load the path client and check the principal may act within its scope
async fn resolve_client(state: &AppState, current: &CurrentClient, client_id: ClientId, action: Operation) -> Result<()> {
    state.store.find_client(client_id).await?.ok_or_else(|| Error::NotFound {
        resource: "Client".to_string(),
        id: client_id.to_string(),
    })?;

    if ownership_enforced(state, action) {
        authorize_client_scope(current, client_id, action, Resource::Users)?;
    }
    Ok(())
}

/// Load a user and check it belongs to the path client (and, when enforced, to the principal)
async fn resolve_user(
    state: &AppState,
    current: &CurrentClient,
    client_id: ClientId,
    user_id: UserId,
    action: Operation,
) -> Result<UserDBResponse> {
    let user = state.store.find_user(user_id).await?.ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: user_id.to_string(),
    })?;

    if ownership_enforced(state, action) {
        authorize_owner_access(Some(current), client_id, user.client_id, action, Resource::Users)?;
    } else if user.client_id != client_id {
        return Err(Error::InsufficientPermissions {
            action,
            resource: Resource::Users,
            reason: "This resource does not belong to this owner".to_string(),
        });
    }
    Ok(user)
}

/// List a client's users
#[utoipa::path(
    get,
    path = "/api/clients/{clientId}/users",
    tag = "users",
    summary = "List client users",
    params(("clientId" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "The client's users", body = Vec<UserResponse>),
        (status = 204, description = "The client has no users"),
        (status = 400, description = "Invalid client id", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Not the caller's client", body = crate::errors::ErrorBody),
        (status = 404, description = "Client not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(principal = current.id))]
pub async fn list_users(State(state): State<AppState>, current: CurrentClient, Path(client_id): Path<String>) -> Result<Response> {
    let client_id = parse_path_id("clientId", &client_id)?;
    resolve_client(&state, &current, client_id, Operation::ReadOwn).await?;

    let store = &state.store;
    let users = state
        .caches
        .users
        .get_or_compute(&user_list_key(client_id), &user_list_tags(client_id), move || async move {
            let rows = store.list_users(client_id).await?;
            Ok::<_, Error>(rows.into_iter().map(UserResponse::from).collect::<Vec<_>>())
        })
        .await?;

    if users.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(users).into_response())
}

/// Get one of a client's users
#[utoipa::path(
    get,
    path = "/api/clients/{clientId}/users/{userId}",
    tag = "users",
    summary = "Get client user",
    params(
        ("clientId" = i64, Path, description = "Client ID"),
        ("userId" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 400, description = "Invalid path id", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "The user is not owned by the caller", body = crate::errors::ErrorBody),
        (status = 404, description = "Client or user not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(principal = current.id))]
pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentClient,
    Path((client_id, user_id)): Path<(String, String)>,
) -> Result<Json<UserResponse>> {
    let client_id = parse_path_id("clientId", &client_id)?;
    let user_id = parse_path_id("userId", &user_id)?;

    resolve_client(&state, &current, client_id, Operation::ReadOwn).await?;
    let user = resolve_user(&state, &current, client_id, user_id, Operation::ReadOwn).await?;

    Ok(Json(user.into()))
}

/// Create a user under a client
#[utoipa::path(
    post,
    path = "/api/clients/{clientId}/users",
    tag = "users",
    summary = "Create client user",
    request_body = UserCreate,
    params(("clientId" = i64, Path, description = "Client ID")),
    responses(
        (status = 201, description = "User created; `Location` points at it", body = UserResponse),
        (status = 400, description = "Malformed body or invalid fields", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Not the caller's client", body = crate::errors::ErrorBody),
        (status = 404, description = "Client not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(principal = current.id))]
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentClient,
    Path(client_id): Path<String>,
    body: std::result::Result<Json<UserCreate>, JsonRejection>,
) -> Result<Response> {
    let client_id = parse_path_id("clientId", &client_id)?;
    resolve_client(&state, &current, client_id, Operation::CreateOwn).await?;

    let Json(create) = body?;
    let create = create.validate()?;

    let now = Utc::now();
    let user = state
        .store
        .create_user(&UserCreateDBRequest {
            client_id,
            first_name: create.first_name,
            last_name: create.last_name,
            phone_number: create.phone_number,
            created_at: now,
            updated_at: now,
        })
        .await?;

    state.caches.invalidate_client_users(client_id);
    info!(client_id, user_id = user.id, "Created user");

    let location = format!("/api/clients/{client_id}/users/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(UserResponse::from(user))).into_response())
}

/// Delete one of the caller's users
#[utoipa::path(
    delete,
    path = "/api/clients/{clientId}/users/{userId}",
    tag = "users",
    summary = "Delete client user",
    params(
        ("clientId" = i64, Path, description = "Client ID"),
        ("userId" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid path id", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "The user is not owned by the caller", body = crate::errors::ErrorBody),
        (status = 404, description = "Client or user not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(principal = current.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentClient,
    Path((client_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let client_id = parse_path_id("clientId", &client_id)?;
    let user_id = parse_path_id("userId", &user_id)?;

    resolve_client(&state, &current, client_id, Operation::DeleteOwn).await?;
    let user = resolve_user(&state, &current, client_id, user_id, Operation::DeleteOwn).await?;

    if !state.store.delete_user(user.id).await? {
        return Err(Error::NotFound {
            resource: "User".to_string(),
            id: user_id.to_string(),
        });
    }

    state.caches.invalidate_client_users(client_id);
    info!(client_id, user_id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}
