use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use shopfront_core::comment::{CommentInput, CommentKey, CommentPatch};
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::extract::{parse_id, Payload};
use crate::middleware::{authenticated_middleware, Claims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let owned = Router::new()
        .route("/comments", post(create_comment))
        .route(
            "/products/{id}/users/{user_id}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(state, authenticated_middleware));

    Router::new()
        .route("/comments", get(list_comments))
        .route("/comments/{id}", get(get_comment))
        .merge(owned)
}

fn comment_not_found() -> AppError {
    AppError::NotFoundError("Comment not found".into())
}

/// Path segments are (product, user, comment); all three must match.
fn comment_key((product_id, user_id, comment_id): (String, String, String)) -> ApiResult<CommentKey> {
    Ok(CommentKey {
        comment_id: parse_id(&comment_id)?,
        user_id: parse_id(&user_id)?,
        product_id: parse_id(&product_id)?,
    })
}

async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let comments = state.store.list_comments().await?;

    Ok(Json(json!({
        "message": "Comments fetched",
        "comments": comments,
    })))
}

async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let comment = state.store.get_comment(id).await?.ok_or_else(comment_not_found)?;

    Ok(Json(json!({
        "message": "Comment fetched",
        "comment": comment,
    })))
}

async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Payload(input): Payload<CommentInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    claims.authorize_for(input.user_id)?;

    if state.store.get_product(input.product_id).await?.is_none() {
        return Err(AppError::NotFoundError("Product not found".into()));
    }

    let comment = state.store.create_comment(input).await?;
    info!("Comment {} added to product {}", comment.id, comment.product_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment created",
            "comment": comment,
        })),
    ))
}

async fn update_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(segments): Path<(String, String, String)>,
    Payload(patch): Payload<CommentPatch>,
) -> ApiResult<Json<Value>> {
    let key = comment_key(segments)?;
    claims.authorize_for(key.user_id)?;

    let comment = state
        .store
        .update_comment(key, &patch)
        .await?
        .ok_or_else(comment_not_found)?;

    Ok(Json(json!({
        "message": "Comment updated",
        "comment": comment,
    })))
}

async fn delete_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(segments): Path<(String, String, String)>,
) -> ApiResult<Json<Value>> {
    let key = comment_key(segments)?;
    claims.authorize_for(key.user_id)?;

    let comment = state.store.delete_comment(key).await?.ok_or_else(comment_not_found)?;
    info!("Deleted comment {}", comment.id);

    Ok(Json(json!({
        "message": "Comment deleted",
        "comment": comment,
    })))
}
