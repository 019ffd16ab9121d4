//! Read-only catalog endpoints.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::{
    AppState,
    api::models::{
        pagination::Pagination,
        products::ProductResponse,
    },
    auth::current_user::CurrentClient,
    cache::{PRODUCTS_TAG, product_list_key},
    errors::{Error, Result},
    types::parse_path_id,
};

/// List the catalog, one page at a time
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    summary = "List products",
    params(Pagination),
    responses(
        (status = 200, description = "A page of products in id order", body = Vec<ProductResponse>),
        (status = 400, description = "Invalid page or limit", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "The page is past the end of the catalog", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(client_id = current.id))]
pub async fn list_products(
    State(state): State<AppState>,
    current: CurrentClient,
    query: std::result::Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>> {
    let Query(pagination) = query?;
    let page = pagination.validate()?;

    let key = product_list_key(page.page, page.limit);
    let tags = [PRODUCTS_TAG.to_string()];
    let store = &state.store;
    let products = state
        .caches
        .products
        .get_or_compute(&key, &tags, move || async move {
            let rows = store.list_products(page.offset(), i64::from(page.limit)).await?;
            Ok::<_, Error>(rows.into_iter().map(ProductResponse::from).collect::<Vec<_>>())
        })
        .await?;

    if products.is_empty() {
        return Err(Error::NotFound {
            resource: "Products page".to_string(),
            id: page.page.to_string(),
        });
    }

    Ok(Json(products))
}

/// Get a single catalog entry
#[utoipa::path(
    get,
    path = "/api/products/{productId}",
    tag = "products",
    summary = "Get product",
    params(("productId" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 400, description = "Invalid product id", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(client_id = current.id))]
pub async fn get_product(
    State(state): State<AppState>,
    current: CurrentClient,
    Path(product_id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product_id = parse_path_id("productId", &product_id)?;

    let product = state.store.find_product(product_id).await?.ok_or_else(|| Error::NotFound {
        resource: "Product".to_string(),
        id: product_id.to_string(),
    })?;

    Ok(Json(product.into()))
}
