//! Error taxonomy for the authentication subsystem.
//!
//! Every failure is terminal for the request: there is no downgrade to
//! anonymous access and no partial success. Variants map to the portal's
//! HTTP contract; internals never leak to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::role::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing registration/login fields.
    #[error("{0}")]
    Validation(String),

    /// Registration email already present (case-insensitive).
    #[error("Email already registered")]
    DuplicateIdentity,

    /// Unknown email or wrong password. Deliberately generic so the two
    /// cases cannot be told apart by the caller.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, unsigned, or expired bearer token. All four
    /// surface identically so a probe learns nothing about which check
    /// failed.
    #[error("Invalid or expired token")]
    Unauthenticated,

    /// Token is valid but the subject no longer exists.
    #[error("User not found")]
    IdentityNotFound,

    /// The role selected on the login form does not match the role the
    /// server resolved. Client-side outcome: the session is discarded.
    #[error("Role mismatch: logged in as {granted}, but selected {selected}")]
    RoleMismatch { selected: Role, granted: Role },

    /// Too many failed login attempts inside the current window.
    #[error("Too many attempts, try again later")]
    RateLimited,

    /// Anything unhandled. Logged server-side; the caller gets a
    /// generic message.
    #[error("Server error")]
    Unexpected(#[from] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::DuplicateIdentity
            | Self::InvalidCredentials
            | Self::RoleMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::IdentityNotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Unexpected(err) = &self {
            error!("Unexpected error: {err:?}");
        }

        let body = Json(json!({ "error": self.to_string() }));

        (self.status(), body).into_response()
    }
}
