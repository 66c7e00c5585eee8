//! Juke Core
//!
//! Platform-agnostic domain types, validation and the credential store
//! contract shared by the Juke gateway and its storage backends.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `PartyCode`, `Credential`, `TokenGrant`, `MusicUri`
//! - **Core Traits**: `CredentialStore`
//! - **Error Handling**: Unified `JukeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use juke_core::{Credential, PartyCode};
//! use chrono::{Duration, Utc};
//!
//! let code = PartyCode::parse("ab12c3").unwrap();
//! assert_eq!(code.as_str(), "AB12C3");
//!
//! let credential = Credential::new(code, "access", "refresh", Utc::now() + Duration::hours(1));
//! assert!(!credential.expires_within(Duration::minutes(5), Utc::now()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{JukeError, Result};
pub use store::CredentialStore;
pub use types::{Credential, MusicUri, PartyCode, TokenGrant, UriKind};
pub use validation::normalize_search_query;
