//! Credential verification against stored argon2 hashes.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use tracing::{debug, warn};

use crate::auth::error::AuthError;
use crate::store::{Identity, IdentityStore};

/// Hash a plaintext password with argon2 and a random salt.
///
/// The result is a PHC string carrying algorithm, parameters, salt and
/// digest; it is the only form in which a credential is ever stored.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Unexpected(anyhow::anyhow!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored PHC string.
#[must_use]
pub fn verify_password(plain: &str, phc: &str) -> bool {
    PasswordHash::new(phc).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Check a submitted secret against the identity stored for `identifier`.
///
/// Unknown email and wrong password both come back as
/// [`AuthError::InvalidCredentials`]; the caller cannot tell which check
/// failed, so the login endpoint cannot be used to enumerate accounts.
/// The lookup is the only side effect.
pub async fn verify_credentials(
    store: &dyn IdentityStore,
    identifier: &str,
    supplied_secret: &str,
) -> Result<Identity, AuthError> {
    if identifier.trim().is_empty() || supplied_secret.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    let email = identifier.trim().to_lowercase();

    match store.find_by_email(&email).await {
        Ok(Some(identity)) => {
            if verify_password(supplied_secret, &identity.password_hash) {
                debug!("Credentials verified for {}", identity.id);
                Ok(identity)
            } else {
                warn!("Failed login attempt: wrong password");
                Err(AuthError::InvalidCredentials)
            }
        }
        Ok(None) => {
            // Burn a hash so the unknown-email path does comparable work
            // to a real verification.
            burn_hash(supplied_secret);
            warn!("Failed login attempt: unknown email");
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => Err(AuthError::Unexpected(anyhow::anyhow!(
            "identity lookup failed: {e}"
        ))),
    }
}

fn burn_hash(secret: &str) {
    let salt = SaltString::generate(&mut OsRng);
    let _ = Argon2::default().hash_password(secret.as_bytes(), &salt);
}
