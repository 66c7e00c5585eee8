/// Party credentials and token grants
use crate::error::{JukeError, Result};
use crate::types::PartyCode;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The shared streaming-service credential of a party.
///
/// Host and guests all act through this one credential. A refresh
/// produces a whole new `Credential` that supersedes the stored one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Party this credential belongs to
    pub party_code: PartyCode,

    /// Short-lived bearer token
    pub access_token: String,

    /// Long-lived token used only to mint new access tokens
    pub refresh_token: String,

    /// Instant after which `access_token` must be treated as invalid
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Create a new credential
    pub fn new(
        party_code: PartyCode,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            party_code,
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Whether less than `margin` remains before expiry at `now`
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at - now < margin
    }

    /// Whether the access token has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Build the credential that replaces this one after a refresh.
    ///
    /// Access token and expiry always come from the grant; the refresh
    /// token is carried over when the provider did not rotate it.
    pub fn renewed(&self, grant: TokenGrant) -> Self {
        Self {
            party_code: self.party_code.clone(),
            access_token: grant.access_token,
            refresh_token: grant
                .refresh_token
                .unwrap_or_else(|| self.refresh_token.clone()),
            expires_at: grant.expires_at,
        }
    }
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("party_code", &self.party_code)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Tokens returned by the token endpoint, not yet tied to a party
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// New bearer token
    pub access_token: String,
    /// Present on the first grant and whenever the provider rotates it
    pub refresh_token: Option<String>,
    /// When the access token stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl TokenGrant {
    /// Create a grant from a token response received at `now`
    ///
    /// Fails when `expires_in_secs` does not fit in a timestamp.
    pub fn from_expires_in(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let expires_at = i64::try_from(expires_in_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JukeError::invalid_input(format!(
                    "token lifetime of {} seconds is out of range",
                    expires_in_secs
                ))
            })?;

        Ok(Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at,
        })
    }

    /// Turn an initial grant into the credential of a new party
    pub fn into_credential(self, party_code: PartyCode) -> Result<Credential> {
        let refresh_token = self.refresh_token.ok_or(JukeError::MissingRefreshToken)?;
        Ok(Credential {
            party_code,
            access_token: self.access_token,
            refresh_token,
            expires_at: self.expires_at,
        })
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
