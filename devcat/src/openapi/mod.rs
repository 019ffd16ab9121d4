//! OpenAPI documentation for the `/api` surface.
//!
//! The document is served as JSON at `/api/doc.json` and rendered with Scalar at `/api/doc`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;
use crate::errors::{ErrorBody, FieldViolation};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from `POST /api/login_check`. Include it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "devcat", description = "Device catalog and client account API"),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::login_check,
        api::handlers::products::list_products,
        api::handlers::products::get_product,
        api::handlers::client_users::list_users,
        api::handlers::client_users::get_user,
        api::handlers::client_users::create_user,
        api::handlers::client_users::delete_user,
    ),
    components(schemas(
        api::models::auth::LoginRequest,
        api::models::auth::LoginResponse,
        api::models::products::ProductResponse,
        api::models::users::UserCreate,
        api::models::users::UserResponse,
        ErrorBody,
        FieldViolation,
    )),
    tags(
        (name = "authentication", description = "Session tokens"),
        (name = "products", description = "The device catalog"),
        (name = "users", description = "Users owned by a client"),
    )
)]
pub struct ApiDoc;
