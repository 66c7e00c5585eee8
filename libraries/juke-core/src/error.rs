//! Core error types for Juke

use thiserror::Error;

/// Result type alias using `JukeError`
pub type Result<T> = std::result::Result<T, JukeError>;

/// Core error type for Juke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JukeError {
    /// Party code is not six uppercase alphanumeric characters
    #[error("Invalid party code: {0:?}")]
    InvalidPartyCode(String),

    /// Not a recognised `spotify:<kind>:<id>` URI, or the wrong kind for the operation
    #[error("Invalid Spotify URI: {0}")]
    InvalidUri(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A grant without a refresh token cannot seed a party credential
    #[error("Token grant did not include a refresh token")]
    MissingRefreshToken,

    /// Credential store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl JukeError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
