//! Domain types for Juke

mod credential;
mod party_code;
mod uri;

pub use credential::{Credential, TokenGrant};
pub use party_code::PartyCode;
pub use uri::{MusicUri, UriKind};
