/// Gateway configuration
use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest allowed proactive refresh margin (access tokens live one hour)
pub const MAX_REFRESH_MARGIN_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_spotify")]
    pub spotify: SpotifySettings,

    #[serde(default = "default_gateway")]
    pub gateway: GatewaySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifySettings {
    /// Registered public client id (PKCE flow, no secret)
    #[serde(default)]
    pub client_id: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host of `/authorize` and `/api/token`
    #[serde(default = "default_accounts_base_url")]
    pub accounts_base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewaySettings {
    /// Refresh proactively when less than this remains on the access token
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,

    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl GatewayConfig {
    /// Create a config with defaults and the given client id
    pub fn new(client_id: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.spotify.client_id = client_id.into();
        config
    }

    /// Load configuration from `juke.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Some(Path::new("juke.toml")))
    }

    /// Load configuration from an optional file, then environment.
    ///
    /// Environment variables use the `JUKE_` prefix and `__` between
    /// section and key, e.g. `JUKE_SPOTIFY__CLIENT_ID`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            let path = PathBuf::from(path);
            if path.exists() {
                settings = settings.add_source(config::File::from(path));
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("JUKE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("spotify.scopes")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.spotify.client_id.trim().is_empty() {
            return Err(GatewayError::Config(
                "Spotify client id is required (set JUKE_SPOTIFY__CLIENT_ID)".to_string(),
            ));
        }

        for (name, value) in [
            ("api_base_url", &self.spotify.api_base_url),
            ("accounts_base_url", &self.spotify.accounts_base_url),
            ("redirect_uri", &self.spotify.redirect_uri),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(GatewayError::InvalidUrl(format!(
                    "{} must start with http:// or https:// (got {:?})",
                    name, value
                )));
            }
        }

        if self.gateway.refresh_margin_secs > MAX_REFRESH_MARGIN_SECS {
            return Err(GatewayError::Config(format!(
                "refresh_margin_secs must be at most {} (got {})",
                MAX_REFRESH_MARGIN_SECS, self.gateway.refresh_margin_secs
            )));
        }

        if !(1..=50).contains(&self.gateway.search_limit) {
            return Err(GatewayError::Config(format!(
                "search_limit must be between 1 and 50 (got {})",
                self.gateway.search_limit
            )));
        }

        Ok(())
    }

    /// Full URL of a Web API path such as `/me/player`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.spotify.api_base_url.trim_end_matches('/'), path)
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/api/token",
            self.spotify.accounts_base_url.trim_end_matches('/')
        )
    }

    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize",
            self.spotify.accounts_base_url.trim_end_matches('/')
        )
    }

    pub fn refresh_margin(&self) -> chrono::Duration {
        let secs = self.gateway.refresh_margin_secs.min(MAX_REFRESH_MARGIN_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}

// Default values
fn default_spotify() -> SpotifySettings {
    SpotifySettings {
        client_id: String::new(),
        redirect_uri: default_redirect_uri(),
        scopes: default_scopes(),
        api_base_url: default_api_base_url(),
        accounts_base_url: default_accounts_base_url(),
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:5173/callback".to_string()
}

fn default_scopes() -> Vec<String> {
    [
        "user-read-email",
        "user-read-private",
        "user-read-playback-state",
        "user-modify-playback-state",
        "playlist-read-private",
        "playlist-read-collaborative",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_accounts_base_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_gateway() -> GatewaySettings {
    GatewaySettings {
        refresh_margin_secs: default_refresh_margin_secs(),
        search_limit: default_search_limit(),
        request_timeout_secs: default_request_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_refresh_margin_secs() -> u64 {
    300
}

fn default_search_limit() -> u32 {
    20
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            spotify: default_spotify(),
            gateway: default_gateway(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.gateway.refresh_margin_secs, 300);
        assert_eq!(config.gateway.search_limit, 20);
        assert_eq!(config.refresh_margin(), chrono::Duration::minutes(5));
        assert_eq!(config.token_url(), "https://accounts.spotify.com/api/token");
        assert_eq!(
            config.api_url("/me/player"),
            "https://api.spotify.com/v1/me/player"
        );
    }

    #[test]
    fn test_validate_requires_client_id() {
        assert!(matches!(
            GatewayConfig::default().validate(),
            Err(GatewayError::Config(_))
        ));
        assert!(GatewayConfig::new("client-123").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_limits() {
        let mut config = GatewayConfig::new("client-123");
        config.spotify.api_base_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(GatewayError::InvalidUrl(_))));

        let mut config = GatewayConfig::new("client-123");
        config.gateway.search_limit = 0;
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_validate_bounds_refresh_margin() {
        let mut config = GatewayConfig::new("client-123");
        config.gateway.refresh_margin_secs = MAX_REFRESH_MARGIN_SECS;
        assert!(config.validate().is_ok());

        config.gateway.refresh_margin_secs = u64::MAX;
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
        // Unvalidated configs are clamped instead of overflowing
        assert_eq!(config.refresh_margin(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_trailing_slashes_are_ignored() {
        let mut config = GatewayConfig::new("client-123");
        config.spotify.api_base_url = "http://localhost:8080/".into();
        config.spotify.accounts_base_url = "http://localhost:9090/".into();
        assert_eq!(config.api_url("/search"), "http://localhost:8080/search");
        assert_eq!(config.authorize_url(), "http://localhost:9090/authorize");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("juke.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[spotify]
client_id = "from-file"
redirect_uri = "https://juke.example.com/callback"

[gateway]
search_limit = 10
"#
        )
        .unwrap();

        let config = GatewayConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.spotify.client_id, "from-file");
        assert_eq!(
            config.spotify.redirect_uri,
            "https://juke.example.com/callback"
        );
        assert_eq!(config.gateway.search_limit, 10);
        // Unset keys keep their defaults
        assert_eq!(config.gateway.refresh_margin_secs, 300);
        assert_eq!(config.spotify.api_base_url, "https://api.spotify.com/v1");
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.gateway.search_limit, 20);
    }
}
