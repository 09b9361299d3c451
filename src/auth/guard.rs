//! Access guard applied to every protected request.
//!
//! Pure with respect to the token: verification never mutates anything
//! and never extends expiry. The guard is the authoritative enforcement
//! point; the client-side gate in [`crate::auth::role`] is advisory UX.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::{debug, warn};

use crate::auth::error::AuthError;
use crate::auth::role::Role;
use crate::auth::token::TokenKeys;
use crate::store::{Identity, IdentityStore};

/// Extract and validate the bearer token, then resolve the subject
/// against the identity store.
///
/// Missing header, malformed header, bad signature and expiry all come
/// back as [`AuthError::Unauthenticated`]. A token that verifies but
/// whose subject no longer exists is [`AuthError::IdentityNotFound`],
/// deliberately distinct from the authentication failures.
pub async fn authorize(
    headers: &HeaderMap,
    keys: &TokenKeys,
    store: &dyn IdentityStore,
) -> Result<Identity, AuthError> {
    let token = bearer_token(headers)?;
    let claims = keys.verify(token)?;
    let subject = claims.subject_id()?;

    match store.find_by_id(subject).await {
        Ok(Some(identity)) => {
            debug!("Authorized {} ({})", identity.id, identity.role);
            Ok(identity)
        }
        Ok(None) => {
            warn!("Valid token for deleted identity {subject}");
            Err(AuthError::IdentityNotFound)
        }
        Err(e) => Err(AuthError::Unexpected(anyhow::anyhow!(
            "subject lookup failed: {e}"
        ))),
    }
}

/// Server-side role gate for role-scoped areas.
pub fn require_role(identity: &Identity, required: Role) -> Result<(), AuthError> {
    if identity.role == required {
        Ok(())
    } else {
        warn!(
            "Role gate refused {}: has {}, needs {}",
            identity.id, identity.role, required
        );
        Err(AuthError::Unauthenticated)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthenticated)?;

    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::Unauthenticated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::store::{MemoryIdentityStore, NewIdentity};
    use axum::http::HeaderValue;
    use secrecy::SecretString;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from("guard-test-secret".to_string()))
    }

    async fn seeded_store() -> (MemoryIdentityStore, Identity) {
        let store = MemoryIdentityStore::default();
        let identity = store
            .create(NewIdentity {
                username: "alice".into(),
                email: "alice@x.com".into(),
                password_hash: hash_password("pw123").unwrap(),
                role: Role::Student,
            })
            .await
            .unwrap();
        (store, identity)
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn valid_token_resolves_identity() {
        let keys = keys();
        let (store, identity) = seeded_store().await;
        let token = keys.issue(&identity).unwrap();

        let resolved = authorize(&bearer_headers(&token), &keys, &store)
            .await
            .unwrap();
        assert_eq!(resolved.id, identity.id);
        assert_eq!(resolved.email, "alice@x.com");
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let keys = keys();
        let (store, _) = seeded_store().await;

        let err = authorize(&HeaderMap::new(), &keys, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn malformed_header_is_unauthenticated() {
        let keys = keys();
        let (store, identity) = seeded_store().await;
        let token = keys.issue(&identity).unwrap();

        for value in [
            token.as_str(),
            "Bearer",
            "Bearer ",
            "Basic dXNlcjpwYXNz",
        ] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            let err = authorize(&headers, &keys, &store).await.unwrap_err();
            assert!(matches!(err, AuthError::Unauthenticated), "value: {value}");
        }
    }

    #[tokio::test]
    async fn deleted_identity_is_not_found_not_unauthenticated() {
        let keys = keys();
        let (store, identity) = seeded_store().await;
        let token = keys.issue(&identity).unwrap();

        store.remove(identity.id);

        let err = authorize(&bearer_headers(&token), &keys, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound));
    }

    #[tokio::test]
    async fn role_gate_enforces_required_role() {
        let (_, identity) = seeded_store().await;

        assert!(require_role(&identity, Role::Student).is_ok());
        assert!(matches!(
            require_role(&identity, Role::Administrator).unwrap_err(),
            AuthError::Unauthenticated
        ));
    }
}
