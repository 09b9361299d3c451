use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::auth::{password::hash_password, AuthError, Role};
use crate::eduerp::handlers::{valid_email, valid_password, MIN_PASSWORD_LENGTH};
use crate::store::{DynIdentityStore, NewIdentity, StoreError};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful"),
        (status = 400, description = "Invalid fields or email already registered"),
        (status = 500, description = "Unexpected error"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    store: Extension<DynIdentityStore>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    if request.username.trim().is_empty() {
        return Err(AuthError::Validation("Invalid username".to_string()));
    }

    if !valid_email(&request.email) {
        return Err(AuthError::Validation("Invalid email".to_string()));
    }

    if !valid_password(&request.password) {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(&request.password)?;

    // Self-signup always creates a student; administrators are
    // provisioned out-of-band.
    let identity = NewIdentity {
        username: request.username.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        password_hash,
        role: Role::Student,
    };

    match store.create(identity).await {
        Ok(created) => {
            tracing::info!("Registered {}", created.id);
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "User registered successfully" })),
            ))
        }
        Err(StoreError::Duplicate) => Err(AuthError::DuplicateIdentity),
        Err(StoreError::Backend(e)) => {
            error!("Error inserting user: {e:?}");
            Err(AuthError::Unexpected(e))
        }
    }
}
