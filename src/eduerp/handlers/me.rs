use axum::{
    extract::Extension,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{authorize, AuthError, TokenKeys};
use crate::store::{DynIdentityStore, PublicIdentity};

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated identity, credential stripped", body = PublicIdentity, content_type = "application/json"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Token subject no longer exists"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn me(
    headers: HeaderMap,
    store: Extension<DynIdentityStore>,
    keys: Extension<Arc<TokenKeys>>,
) -> Result<impl IntoResponse, AuthError> {
    let identity = authorize(&headers, &keys, store.as_ref()).await?;

    Ok(Json(PublicIdentity::from(&identity)))
}
