use axum::{extract::Extension, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::auth::rate_limit::RateLimitDecision;
use crate::auth::{verify_credentials, AuthError, RateLimiter, Role, TokenKeys};
use crate::store::DynIdentityStore;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token, valid for one hour.
    pub token: String,
    /// Server-resolved role; the client checks it against the role
    /// selected on the login form before storing the session.
    pub role: Role,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Invalid credentials"),
        (status = 429, description = "Too many failed attempts"),
        (status = 500, description = "Unexpected error"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    store: Extension<DynIdentityStore>,
    keys: Extension<Arc<TokenKeys>>,
    limiter: Extension<Arc<dyn RateLimiter>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    if limiter.check(&request.email) == RateLimitDecision::Limited {
        return Err(AuthError::RateLimited);
    }

    let identity = match verify_credentials(store.as_ref(), &request.email, &request.password)
        .await
    {
        Ok(identity) => identity,
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                limiter.record_failure(&request.email);
            }
            return Err(err);
        }
    };

    limiter.record_success(&request.email);

    let token = keys.issue(&identity)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        role: identity.role,
    }))
}
