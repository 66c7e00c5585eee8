//! Shared fixtures for gateway integration tests

#![allow(dead_code)]

use chrono::{Duration, Utc};
use juke_core::{Credential, PartyCode};
use juke_gateway::{GatewayConfig, PartyGateway};
use juke_storage::InMemoryCredentialStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

pub type TestGateway = PartyGateway<InMemoryCredentialStore>;

/// Route gateway logs to the test output (`RUST_LOG=juke_gateway=debug`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config pointing both the Web API and the accounts service at a mock server
pub fn test_config(server: &MockServer) -> GatewayConfig {
    let mut config = GatewayConfig::new("test-client-id");
    config.spotify.api_base_url = server.uri();
    config.spotify.accounts_base_url = server.uri();
    config.spotify.redirect_uri = "http://localhost:5173/callback".to_string();
    config
}

/// Gateway over an in-memory store holding `credentials`
pub fn gateway(server: &MockServer, credentials: Vec<Credential>) -> TestGateway {
    init_tracing();
    let store = Arc::new(InMemoryCredentialStore::with_credentials(credentials));
    PartyGateway::new(test_config(server), store).expect("valid test config")
}

pub fn code(s: &str) -> PartyCode {
    PartyCode::parse(s).expect("valid party code")
}

/// Credential for `party` whose access token expires after `expires_in`
pub fn credential(party: &str, access_token: &str, expires_in: Duration) -> Credential {
    Credential::new(
        code(party),
        access_token,
        "host-refresh-token",
        Utc::now() + expires_in,
    )
}

/// Credential comfortably outside the refresh margin
pub fn fresh_credential(party: &str, access_token: &str) -> Credential {
    credential(party, access_token, Duration::hours(1))
}

/// Credential inside the refresh margin
pub fn expiring_credential(party: &str, access_token: &str) -> Credential {
    credential(party, access_token, Duration::minutes(2))
}

/// Token endpoint body for a refresh that does not rotate the refresh token
pub fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "scope": "user-read-playback-state",
        "expires_in": 3600
    })
}

/// Web API track object as returned inside search results
pub fn api_track(index: usize) -> Value {
    json!({
        "id": format!("track{}", index),
        "uri": format!("spotify:track:track{}", index),
        "name": format!("Track {}", index),
        "artists": [{"name": "Daft Punk"}],
        "album": {
            "name": "Discovery",
            "images": [{"url": format!("https://i.scdn.co/image/{}", index), "height": 300, "width": 300}]
        },
        "duration_ms": 200_000 + index
    })
}

pub fn api_device(id: &str, name: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Computer",
        "is_active": is_active,
        "is_restricted": false,
        "is_private_session": false,
        "volume_percent": 70,
        "supports_volume": true
    })
}
