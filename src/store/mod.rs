//! Identity store: the persistent user collaborator.
//!
//! The auth core only depends on the [`IdentityStore`] trait. Production
//! wiring uses the Postgres implementation; tests use the in-memory one.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::role::Role;

mod memory;
mod postgres;

pub use self::memory::MemoryIdentityStore;
pub use self::postgres::PgIdentityStore;

/// A stored identity. The password hash is write-only: it never leaves
/// the auth subsystem, see [`PublicIdentity`] for the serialized form.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    /// Stored lowercased; uniqueness is enforced at creation.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
}

/// The only projection of an identity that is ever serialized.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&Identity> for PublicIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
        }
    }
}

/// Input for identity creation. The email is normalized by the caller;
/// the hash is produced by [`crate::auth::password::hash_password`].
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An identity with the same email already exists.
    #[error("duplicate email")]
    Duplicate,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity; [`StoreError::Duplicate`] when the email
    /// is already taken (case-insensitive).
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError>;

    /// Lookup by lowercased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    /// Lookup by id, for resolving token subjects.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;
}

/// Shared handle used in router extensions.
pub type DynIdentityStore = Arc<dyn IdentityStore>;
