//! Error types for the Juke gateway.

use juke_core::{JukeError, PartyCode};
use thiserror::Error;

/// Typed failures returned by the gateway.
///
/// Every non-success path of a gateway call ends in one of these; the UI
/// picks its message from the variant.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No live credential on record for the party
    #[error("No credential on record for party {0}")]
    CredentialNotFound(PartyCode),

    /// Still unauthorized after one refresh and retry
    #[error("Authentication failed after refreshing the access token")]
    AuthenticationFailed,

    /// Playback endpoint answered 404: nothing is playing anywhere
    #[error("No active playback device")]
    NoActiveDevice,

    /// Playback endpoint answered 403: the account plan lacks the capability
    #[error("Account plan does not allow this action")]
    EntitlementRequired,

    /// The refresh-token exchange itself failed
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Any other non-2xx answer, or a transport failure (`status` is `None`)
    #[error("Upstream error ({}): {message}", display_status(.status))]
    Upstream { status: Option<u16>, message: String },

    /// The authorization code was already exchanged in this session
    #[error("Authorization code has already been used")]
    AuthorizationCodeReused,

    /// `complete_authorization` called without a preceding `begin_authorization`
    #[error("No authorization in progress")]
    AuthorizationNotStarted,

    /// The `state` returned by the provider does not match the pending login
    #[error("Authorization state mismatch")]
    AuthorizationStateMismatch,

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Validation or credential store failure
    #[error(transparent)]
    Core(#[from] JukeError),
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "no response".to_string(), |s| s.to_string())
}

impl GatewayError {
    /// Create an upstream error for a status code
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether the host has to log in again for the party to keep working
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::RefreshFailed(_) | Self::CredentialNotFound(_)
        )
    }

    /// Message suitable for showing to host or guests
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CredentialNotFound(_) => "This party has ended or does not exist.",
            Self::AuthenticationFailed | Self::RefreshFailed(_) => {
                "The host's Spotify session has expired. The host needs to log in again."
            }
            Self::NoActiveDevice => {
                "No active Spotify device. Open Spotify on any device and start playing a song, then try again."
            }
            Self::EntitlementRequired => "This action requires a Spotify Premium account.",
            Self::AuthorizationCodeReused
            | Self::AuthorizationNotStarted
            | Self::AuthorizationStateMismatch => "Login could not be completed. Please try again.",
            Self::Core(JukeError::InvalidPartyCode(_)) => {
                "Party codes are 6 letters or digits."
            }
            Self::Core(JukeError::InvalidUri(_) | JukeError::InvalidInput(_)) => {
                "That request was not valid."
            }
            _ => "Something went wrong. Please try again.",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        assert_eq!(
            GatewayError::upstream(500, "boom").to_string(),
            "Upstream error (500): boom"
        );
        let transport = GatewayError::Upstream {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(
            transport.to_string(),
            "Upstream error (no response): connection refused"
        );
    }

    #[test]
    fn test_reauthentication_kinds() {
        assert!(GatewayError::AuthenticationFailed.requires_reauthentication());
        assert!(GatewayError::RefreshFailed("invalid_grant".into()).requires_reauthentication());
        assert!(!GatewayError::NoActiveDevice.requires_reauthentication());
        assert!(!GatewayError::upstream(503, "").requires_reauthentication());
    }

    #[test]
    fn test_user_messages_are_specific() {
        assert!(GatewayError::NoActiveDevice
            .user_message()
            .contains("Open Spotify"));
        assert!(GatewayError::EntitlementRequired
            .user_message()
            .contains("Premium"));
        assert_eq!(
            GatewayError::AuthenticationFailed.user_message(),
            GatewayError::RefreshFailed(String::new()).user_message()
        );
    }
}
