use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use shopfront_core::favorite::FavoriteInput;
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::extract::{parse_id, Payload};
use crate::middleware::{authenticated_middleware, Claims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/{id}/favorites", get(list_favorites).post(add_favorite))
        .route("/users/{id}/favorites/{product_id}", delete(remove_favorite))
        .route_layer(middleware::from_fn_with_state(state, authenticated_middleware))
}

async fn list_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let customer_id = parse_id(&id)?;
    claims.authorize_for(customer_id)?;

    let favorites = state.store.list_favorites(customer_id).await?;

    Ok(Json(json!({
        "message": "Favorites fetched",
        "favorites": favorites,
    })))
}

async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Payload(input): Payload<FavoriteInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let customer_id = parse_id(&id)?;
    claims.authorize_for(customer_id)?;

    if state.store.get_user(customer_id).await?.is_none() {
        return Err(AppError::NotFoundError("User not found".into()));
    }
    if state.store.get_product(input.product_id).await?.is_none() {
        return Err(AppError::NotFoundError("Product not found".into()));
    }

    let favorite = state.store.add_favorite(customer_id, input.product_id).await?;
    info!("User {} favorited product {}", customer_id, favorite.product_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Favorite added",
            "favorite": favorite,
        })),
    ))
}

async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, product_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let customer_id = parse_id(&id)?;
    let product_id = parse_id(&product_id)?;
    claims.authorize_for(customer_id)?;

    let favorite = state
        .store
        .remove_favorite(customer_id, product_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Favorite not found".into()))?;

    Ok(Json(json!({
        "message": "Favorite removed",
        "favorite": favorite,
    })))
}
