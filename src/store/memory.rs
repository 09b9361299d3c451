//! In-memory identity store for tests and local demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::{Identity, IdentityStore, NewIdentity, StoreError};

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identities: RwLock<HashMap<Uuid, Identity>>,
}

impl MemoryIdentityStore {
    /// Remove an identity, simulating out-of-band deletion. Lets tests
    /// exercise the valid-token-for-deleted-subject path.
    pub fn remove(&self, id: Uuid) {
        if let Ok(mut identities) = self.identities.write() {
            identities.remove(&id);
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let mut identities = self
            .identities
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;

        let email = identity.email.to_lowercase();
        if identities.values().any(|existing| existing.email == email) {
            return Err(StoreError::Duplicate);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            username: identity.username,
            email,
            password_hash: identity.password_hash,
            role: identity.role,
        };
        identities.insert(identity.id, identity.clone());

        Ok(identity)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let identities = self
            .identities
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;

        let email = email.to_lowercase();
        Ok(identities
            .values()
            .find(|identity| identity.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let identities = self
            .identities
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store lock poisoned")))?;

        Ok(identities.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn new_identity(email: &str) -> NewIdentity {
        NewIdentity {
            username: "alice".into(),
            email: email.into(),
            password_hash: "$argon2id$unused".into(),
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn create_then_lookup() {
        let store = MemoryIdentityStore::default();
        let created = store.create(new_identity("alice@x.com")).await.unwrap();

        let by_email = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let store = MemoryIdentityStore::default();
        store.create(new_identity("alice@x.com")).await.unwrap();

        let err = store
            .create(new_identity("ALICE@X.COM"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn removed_identity_is_gone() {
        let store = MemoryIdentityStore::default();
        let created = store.create(new_identity("alice@x.com")).await.unwrap();

        store.remove(created.id);
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }
}
