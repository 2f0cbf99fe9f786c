use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use shopfront_catalog::validation::parse;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Validated JSON body. Bad syntax, a wrong content type, missing or
/// mistyped fields and failed field rules all become a 400 validation error
/// instead of axum's default rejection.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid(rejection.body_text()))?;

        Ok(Payload(parse(value)?))
    }
}

/// Document ids arrive as raw path segments; anything that is not a UUID is
/// rejected the same way the store rejects a malformed identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid("Invalid id"))
}
