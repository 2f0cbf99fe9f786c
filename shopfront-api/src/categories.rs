use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shopfront_catalog::CategoryInput;
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::extract::{parse_id, Payload};
use crate::middleware::admin_auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(replace_category).delete(delete_category))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category))
        .merge(admin)
}

fn category_not_found() -> AppError {
    AppError::NotFoundError("Category not found".into())
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let categories = state.store.list_categories().await?;

    Ok(Json(json!({
        "message": "Categories fetched",
        "categories": categories,
    })))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let category = state.store.get_category(id).await?.ok_or_else(category_not_found)?;

    Ok(Json(json!({
        "message": "Category fetched",
        "category": category,
    })))
}

async fn create_category(
    State(state): State<AppState>,
    Payload(input): Payload<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let category = state.store.create_category(input).await?;
    info!("Created category {} ({})", category.id, category.name);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created",
            "category": category,
        })),
    ))
}

async fn replace_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<CategoryInput>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let category = state
        .store
        .replace_category(id, input)
        .await?
        .ok_or_else(category_not_found)?;

    Ok(Json(json!({
        "message": "Category updated",
        "category": category,
    })))
}

// Products keep their categoryId; listings then show `category: null`.
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let category = state.store.delete_category(id).await?.ok_or_else(category_not_found)?;
    info!("Deleted category {}", category.id);

    Ok(Json(json!({
        "message": "Category deleted",
        "category": category,
    })))
}
