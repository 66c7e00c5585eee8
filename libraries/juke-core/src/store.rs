//! Credential store trait

use crate::error::Result;
use crate::types::{Credential, PartyCode};
use async_trait::async_trait;

/// Persistence for the one live credential of each party.
///
/// The gateway never caches credentials; every call goes through the
/// store, which makes it the single shared mutable resource between
/// concurrent requests for the same party.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Get the live credential for a party.
    ///
    /// Returns `None` when the party is unknown or has been retired.
    async fn get_credential(&self, party_code: &PartyCode) -> Result<Option<Credential>>;

    /// Store a credential, replacing any previous one for the same party.
    ///
    /// Writes for a retired party are ignored.
    async fn put_credential(&self, credential: &Credential) -> Result<()>;

    /// Store the first credential of a new party.
    ///
    /// Returns `false` without writing if the code was ever used before,
    /// live or retired.
    async fn claim(&self, credential: &Credential) -> Result<bool>;

    /// Retire a party's credential once the party ends.
    ///
    /// Returns `true` if a live credential was retired.
    async fn retire(&self, party_code: &PartyCode) -> Result<bool>;

    /// Check whether a party currently has a live credential
    async fn is_live(&self, party_code: &PartyCode) -> Result<bool> {
        Ok(self.get_credential(party_code).await?.is_some())
    }
}
