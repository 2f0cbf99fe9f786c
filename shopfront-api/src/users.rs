use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shopfront_core::identity::{NewUser, RegisterUser};
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::extract::{parse_id, Payload};
use crate::middleware::admin_auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new()
        .route("/users", post(register_user))
        .merge(admin)
}

async fn hash_password(password: String, cost: u32) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))
}

async fn register_user(
    State(state): State<AppState>,
    Payload(register): Payload<RegisterUser>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let email = register.email.trim().to_lowercase();
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::ConflictError("Email is already registered".into()));
    }

    let password_hash = hash_password(register.password.clone(), state.auth.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser::member(register, password_hash))
        .await?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered",
            "user": user,
        })),
    ))
}

async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let users = state.store.list_users().await?;

    Ok(Json(json!({
        "message": "Users fetched",
        "users": users,
    })))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("User not found".into()))?;

    Ok(Json(json!({
        "message": "User fetched",
        "user": user,
    })))
}
