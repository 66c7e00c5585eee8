//! In-memory credential store

use async_trait::async_trait;
use juke_core::{error::Result, Credential, CredentialStore, PartyCode};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
enum Slot {
    Live(Credential),
    Retired,
}

/// Credential store kept in process memory.
///
/// Same semantics as the `SQLite` store (retired codes stay reserved),
/// without persistence.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slots: RwLock<HashMap<PartyCode, Slot>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with live credentials
    pub fn with_credentials(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let slots = credentials
            .into_iter()
            .map(|c| (c.party_code.clone(), Slot::Live(c)))
            .collect();
        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Number of live parties
    pub async fn live_count(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_credential(&self, party_code: &PartyCode) -> Result<Option<Credential>> {
        match self.slots.read().await.get(party_code) {
            Some(Slot::Live(credential)) => Ok(Some(credential.clone())),
            _ => Ok(None),
        }
    }

    async fn put_credential(&self, credential: &Credential) -> Result<()> {
        let mut slots = self.slots.write().await;
        if let Some(Slot::Retired) = slots.get(&credential.party_code) {
            debug!(party_code = %credential.party_code, "Ignored credential write for retired party");
            return Ok(());
        }
        slots.insert(
            credential.party_code.clone(),
            Slot::Live(credential.clone()),
        );
        Ok(())
    }

    async fn claim(&self, credential: &Credential) -> Result<bool> {
        let mut slots = self.slots.write().await;
        if slots.contains_key(&credential.party_code) {
            return Ok(false);
        }
        slots.insert(
            credential.party_code.clone(),
            Slot::Live(credential.clone()),
        );
        Ok(true)
    }

    async fn retire(&self, party_code: &PartyCode) -> Result<bool> {
        let mut slots = self.slots.write().await;
        match slots.get_mut(party_code) {
            Some(slot) if matches!(slot, Slot::Live(_)) => {
                *slot = Slot::Retired;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
