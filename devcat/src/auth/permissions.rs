//! Ownership-scoped authorization and role resolution.
//!
//! Client-scoped routes (`/api/clients/{clientId}/users/...`) are gated by
//! [`authorize_owner_access`], which runs three checks in a fixed order so the status code is
//! predictable: missing principal (401), principal is not the path client (403), resource is
//! not owned by the principal (403).

use crate::auth::current_user::CurrentClient;
use crate::errors::{Error, Result};
use crate::types::{ClientId, Operation, Resource};
use std::collections::BTreeSet;

/// Role every authenticated client holds, whether or not it is stored.
pub const ROLE_USER: &str = "ROLE_USER";

/// Stored roles plus [`ROLE_USER`]. Computed on read, never persisted.
pub fn effective_roles(stored: &[String]) -> BTreeSet<String> {
    stored
        .iter()
        .cloned()
        .chain(std::iter::once(ROLE_USER.to_string()))
        .collect()
}

/// Check that `principal` may perform `action` on a resource owned by `resource_owner_id`,
/// reached through the path segment `path_client_id`.
pub fn authorize_owner_access(
    principal: Option<&CurrentClient>,
    path_client_id: ClientId,
    resource_owner_id: ClientId,
    action: Operation,
    resource: Resource,
) -> Result<()> {
    let principal = principal.ok_or(Error::Unauthenticated { message: None })?;

    authorize_client_scope(principal, path_client_id, action, resource)?;

    if resource_owner_id != principal.id {
        return Err(Error::InsufficientPermissions {
            action,
            resource,
            reason: "This resource does not belong to this owner".to_string(),
        });
    }

    Ok(())
}

/// The first half of [`authorize_owner_access`]: the principal must be the client named in the
/// path. Used on its own before the target resource has been loaded.
pub fn authorize_client_scope(principal: &CurrentClient, path_client_id: ClientId, action: Operation, resource: Resource) -> Result<()> {
    if principal.id != path_client_id {
        return Err(Error::InsufficientPermissions {
            action,
            resource,
            reason: "You cannot access resources of another client".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn principal(id: ClientId) -> CurrentClient {
        CurrentClient {
            id,
            email: format!("client{id}@example.com"),
            roles: effective_roles(&["ROLE_CLIENT".to_string()]),
        }
    }

    fn check(principal: Option<&CurrentClient>, path: ClientId, owner: ClientId) -> Result<()> {
        authorize_owner_access(principal, path, owner, Operation::DeleteOwn, Resource::Users)
    }

    #[test]
    fn missing_principal_is_unauthenticated_before_anything_else() {
        let err = check(None, 1, 2).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn foreign_path_client_is_forbidden() {
        let a = principal(1);
        let err = check(Some(&a), 2, 2).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.user_message(), "You cannot access resources of another client");
    }

    #[test]
    fn foreign_resource_is_forbidden() {
        let a = principal(1);
        let err = check(Some(&a), 1, 2).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.user_message(), "This resource does not belong to this owner");
    }

    #[test]
    fn owner_is_allowed() {
        let a = principal(1);
        assert!(check(Some(&a), 1, 1).is_ok());
    }

    #[test]
    fn effective_roles_always_include_role_user() {
        assert_eq!(effective_roles(&[]), BTreeSet::from([ROLE_USER.to_string()]));

        let roles = effective_roles(&["ROLE_CLIENT".to_string(), ROLE_USER.to_string()]);
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("ROLE_CLIENT"));
        assert!(roles.contains(ROLE_USER));
    }
}
