use crate::credentials;
use async_trait::async_trait;
use juke_core::{error::Result, Credential, CredentialStore, PartyCode};
use sqlx::SqlitePool;
use tracing::debug;

/// Credential store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get_credential(&self, party_code: &PartyCode) -> Result<Option<Credential>> {
        Ok(credentials::get(&self.pool, party_code).await?)
    }

    async fn put_credential(&self, credential: &Credential) -> Result<()> {
        let written = credentials::upsert(&self.pool, credential).await?;
        if !written {
            debug!(party_code = %credential.party_code, "Ignored credential write for retired party");
        }
        Ok(())
    }

    async fn claim(&self, credential: &Credential) -> Result<bool> {
        Ok(credentials::insert_new(&self.pool, credential).await?)
    }

    async fn retire(&self, party_code: &PartyCode) -> Result<bool> {
        Ok(credentials::retire(&self.pool, party_code).await?)
    }
}
