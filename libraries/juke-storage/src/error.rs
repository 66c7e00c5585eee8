/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored row could not be turned back into a credential
    #[error("Corrupt credential row for party {party_code}: {reason}")]
    Corrupt { party_code: String, reason: String },

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a corrupt row error
    pub fn corrupt(party_code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            party_code: party_code.into(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for juke_core::JukeError {
    fn from(err: StorageError) -> Self {
        juke_core::JukeError::storage(err.to_string())
    }
}
