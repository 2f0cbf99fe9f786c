use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shopfront_core::identity::ADMIN_ROLE;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Admins may act for anyone; everybody else only for themselves.
    pub fn may_act_for(&self, user_id: Uuid) -> bool {
        self.is_admin() || self.sub == user_id.to_string()
    }

    pub fn authorize_for(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.may_act_for(user_id) {
            Ok(())
        } else {
            Err(AppError::AuthorizationError("Cannot act for another user".into()))
        }
    }
}

fn bearer_claims(state: &AppState, req: &Request) -> Result<Claims, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".into()))?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::AuthenticationError("Invalid token".into()))
}

// ============================================================================
// Authenticated User Middleware
// ============================================================================

pub async fn authenticated_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(&state, &req)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

// ============================================================================
// Admin Authentication Middleware
// ============================================================================

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(&state, &req)?;

    if !claims.is_admin() {
        return Err(AppError::AuthorizationError("Admin role required".into()));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
