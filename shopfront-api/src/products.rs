use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shopfront_catalog::{
    check_merged, prepare_full_update, prepare_partial_update, ProductInput, ProductPatch,
};
use shopfront_core::listing::ListQuery;
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::extract::{parse_id, Payload};
use crate::middleware::admin_auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/products", post(create_product))
        .route(
            "/products/{id}",
            put(replace_product).patch(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .merge(admin)
}

fn product_not_found() -> AppError {
    AppError::NotFoundError("Product not found".into())
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /products?_sort=&_order=&_limit=`, each product joined with its category.
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query.map_err(|rejection| AppError::invalid(rejection.body_text()))?;
    let options = query.into_options(state.listing.default_limit, state.listing.max_limit);

    let products = state.store.list_products(&options).await?;

    Ok(Json(json!({
        "message": "Products fetched",
        "products": products,
    })))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let product = state.store.get_product(id).await?.ok_or_else(product_not_found)?;

    Ok(Json(json!({
        "message": "Product fetched",
        "product": product,
    })))
}

async fn create_product(
    State(state): State<AppState>,
    Payload(input): Payload<ProductInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let draft = prepare_full_update(input)?;
    let product = state.store.create_product(draft).await?;

    info!(
        "Created product {} (quantity {}, {})",
        product.id, product.quantity, product.inventory_status
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created",
            "product": product,
        })),
    ))
}

/// Full update: the stored record is replaced by the submitted one after
/// `quantity` and `inventoryStatus` are recomputed from `colorSizes`.
async fn replace_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<ProductInput>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let draft = prepare_full_update(input)?;

    let product = state
        .store
        .replace_product(id, draft)
        .await?
        .ok_or_else(product_not_found)?;

    info!(
        "Replaced product {} (quantity {}, {})",
        product.id, product.quantity, product.inventory_status
    );

    Ok(Json(json!({
        "message": "Product updated",
        "product": product,
    })))
}

/// Partial update: only the submitted keys are merged into the stored record.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(patch): Payload<ProductPatch>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    if patch.is_empty() {
        return Err(AppError::invalid("At least one field is required"));
    }

    let patch = prepare_partial_update(patch)?;

    let mut merged = state.store.get_product(id).await?.ok_or_else(product_not_found)?;
    patch.apply_to(&mut merged);
    check_merged(&merged)?;

    let product = state
        .store
        .merge_product(id, &patch)
        .await?
        .ok_or_else(product_not_found)?;

    info!("Patched product {}", product.id);

    Ok(Json(json!({
        "message": "Product updated",
        "product": product,
    })))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let product = state.store.delete_product(id).await?.ok_or_else(product_not_found)?;

    info!("Deleted product {}", product.id);

    Ok(Json(json!({
        "message": "Product deleted",
        "product": product,
    })))
}
