//! Postgres-backed identity store, see `sql/schema.sql`.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use super::{Identity, IdentityStore, NewIdentity, StoreError};
use crate::auth::role::Role;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn identity_from_row(row: &PgRow) -> Result<Identity, StoreError> {
    let role: String = row.get("role");
    let role = Role::from_str(&role)
        .map_err(|e| StoreError::Backend(anyhow::anyhow!("invalid role in store: {e}")))?;

    Ok(Identity {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password"),
        role,
    })
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let row = sqlx::query(
            "INSERT INTO users (username, email, password, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, email, password, role",
        )
        .bind(&identity.username)
        .bind(identity.email.to_lowercase())
        .bind(&identity.password_hash)
        .bind(identity.role.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                    return StoreError::Duplicate;
                }
            }
            StoreError::Backend(anyhow::anyhow!("insert failed: {e}"))
        })?;

        identity_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        sqlx::query(
            "SELECT id, username, email, password, role FROM users WHERE email = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(anyhow::anyhow!("lookup by email failed: {e}")))?
        .map(|row| identity_from_row(&row))
        .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        sqlx::query("SELECT id, username, email, password, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(anyhow::anyhow!("lookup by id failed: {e}")))?
            .map(|row| identity_from_row(&row))
            .transpose()
    }
}
