//! Token issuance and verification.
//!
//! Tokens are self-contained HS256 JWTs; there is no server-side session
//! table. The signing secret is mandatory deployment configuration, so
//! the keys are built once at startup and the process refuses to start
//! without them. Role is embedded as a signed claim: the guard, not the
//! login response body, is the source of truth for authorization.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::role::Role;
use crate::store::Identity;

/// Fixed token lifetime: one hour from issuance, not configurable per
/// call.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id (identity UUID).
    pub sub: String,
    /// Subject email at issuance.
    pub email: String,
    /// Role, signed into the token.
    pub role: Role,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expires-at, Unix seconds.
    pub exp: i64,
}

impl Claims {
    /// Parse the subject id back into a UUID.
    ///
    /// A token whose subject does not parse was not produced by this
    /// issuer, so it fails like any other tampered token.
    pub fn subject_id(&self) -> Result<Uuid, AuthError> {
        self.sub.parse().map_err(|_| AuthError::Unauthenticated)
    }
}

/// Signing and verification keys derived from the configured secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a hard boundary; no clock leeway.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for a verified identity, expiring in
    /// [`TOKEN_TTL_SECONDS`].
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token with an explicit issuance instant. Used by tests to
    /// probe the expiry boundary without sleeping.
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            role: identity.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
        };

        debug!("Issuing token for {}", identity.id);

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Unexpected(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Validate signature and expiry and return the claims.
    ///
    /// Bad signature, malformed structure and expiry all collapse into
    /// [`AuthError::Unauthenticated`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {e}");
                AuthError::Unauthenticated
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from("test-secret-which-is-long-enough".to_string()))
    }

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "$argon2id$unused".into(),
            role: Role::Student,
        }
    }

    #[test]
    fn issue_then_verify_returns_signed_claims() {
        let keys = keys();
        let identity = identity();

        let token = keys.issue(&identity).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.subject_id().unwrap(), identity.id);
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn accepted_just_before_expiry_rejected_just_after() {
        let keys = keys();
        let identity = identity();

        // Issued 59 minutes ago: one minute of life left.
        let token = keys
            .issue_at(&identity, Utc::now() - Duration::minutes(59))
            .unwrap();
        assert!(keys.verify(&token).is_ok());

        // Issued 61 minutes ago: expired one minute ago.
        let token = keys
            .issue_at(&identity, Utc::now() - Duration::minutes(61))
            .unwrap();
        assert!(matches!(
            keys.verify(&token).unwrap_err(),
            AuthError::Unauthenticated
        ));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let keys = keys();
        let token = keys.issue(&identity()).unwrap();

        // Flip the last signature character.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            keys.verify(&tampered).unwrap_err(),
            AuthError::Unauthenticated
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = keys().issue(&identity()).unwrap();
        let other = TokenKeys::new(&SecretString::from("a-completely-different-secret".to_string()));

        assert!(matches!(
            other.verify(&token).unwrap_err(),
            AuthError::Unauthenticated
        ));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let keys = keys();
        for junk in ["", "abc", "a.b", "a.b.c", "Bearer x.y.z"] {
            assert!(matches!(
                keys.verify(junk).unwrap_err(),
                AuthError::Unauthenticated
            ));
        }
    }

    #[test]
    fn claims_with_bogus_subject_fail_to_resolve() {
        let claims = Claims {
            sub: "not-a-uuid".into(),
            email: "alice@x.com".into(),
            role: Role::Student,
            iat: 0,
            exp: 0,
        };
        assert!(matches!(
            claims.subject_id().unwrap_err(),
            AuthError::Unauthenticated
        ));
    }
}
