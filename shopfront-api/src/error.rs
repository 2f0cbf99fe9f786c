use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shopfront_catalog::CatalogError;
use shopfront_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),
    #[error("Not allowed: {0}")]
    AuthorizationError(String),
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationError(Vec<String>),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("Conflict: {0}")]
    ConflictError(String),
    #[error("Internal error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![message.into()])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, json!({ "message": msg })),
            // Every failing field, as a list
            AppError::ValidationError(messages) => {
                (StatusCode::BAD_REQUEST, json!({ "message": messages }))
            }
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(messages) => AppError::ValidationError(messages),
            CoreError::NotFoundError(msg) => AppError::NotFoundError(msg),
            CoreError::ConflictError(msg) => AppError::ConflictError(msg),
            CoreError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::from(CoreError::from(err))
    }
}

pub type ApiResult<T> = Result<T, AppError>;
