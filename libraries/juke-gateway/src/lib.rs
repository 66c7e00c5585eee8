//! Juke Gateway
//!
//! Credentialed request gateway between a party and the host's Spotify
//! account. Guests act through a party code; the gateway looks up the
//! host's credential, keeps it fresh and maps Web API answers to typed
//! outcomes.
//!
//! # Features
//!
//! - **Host login**: Authorization code flow with PKCE, single-use codes
//! - **Token upkeep**: Proactive refresh near expiry, one refresh and retry on 401
//! - **Playback**: Queue, pause, resume, skip, context playback, device transfer
//! - **Catalog**: Track search, host profile, host playlists
//!
//! # Example
//!
//! ```ignore
//! use juke_gateway::{GatewayConfig, PartyGateway};
//! use juke_storage::{create_pool, run_migrations, SqliteCredentialStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("sqlite://juke.db?mode=rwc").await?;
//!     run_migrations(&pool).await?;
//!
//!     let gateway = PartyGateway::new(GatewayConfig::load()?, Arc::new(SqliteCredentialStore::new(pool)))?;
//!
//!     // Host login
//!     let authorizer = gateway.host_authorizer();
//!     let request = authorizer.begin_authorization().await?;
//!     println!("Log in at {}", request.url);
//!     let grant = authorizer.complete_authorization("code-from-callback", Some(&request.state)).await?;
//!
//!     // Party
//!     let credential = gateway.open_party(grant).await?;
//!     println!("Party code: {}", credential.party_code);
//!     gateway.pause(&credential.party_code).await?;
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod config;
mod error;
mod gateway;
mod library;
mod player;
mod request;
mod types;

pub use auth::{AuthorizationRequest, HostAuthorizer, PkceChallenge};
pub use config::{GatewayConfig, GatewaySettings, SpotifySettings};
pub use error::{GatewayError, Result};
pub use gateway::PartyGateway;
pub use request::{EndpointClass, RequestSpec};
pub use types::{
    Device, DeviceAvailability, ImageRef, PlaybackSnapshot, PlaylistSummary, TrackSummary,
    UserProfile,
};

pub use reqwest::Method;
