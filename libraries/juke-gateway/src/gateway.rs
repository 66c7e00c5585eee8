//! The credentialed request gateway.

use crate::auth::{HostAuthorizer, TokenClient};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::request::{EndpointClass, RequestSpec};
use chrono::Utc;
use juke_core::{Credential, CredentialStore, JukeError, PartyCode, TokenGrant};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Attempts at drawing an unused party code before giving up
const MAX_CODE_ATTEMPTS: usize = 8;

/// Executes Web API calls for a party with the party's shared credential.
///
/// The gateway keeps no state of its own: every call reads the credential
/// from the store, refreshes it when it is close to expiry or rejected,
/// and writes the renewed credential back.
///
/// # Example
///
/// ```ignore
/// use juke_gateway::{GatewayConfig, PartyGateway};
/// use juke_storage::InMemoryCredentialStore;
/// use std::sync::Arc;
///
/// let gateway = PartyGateway::new(GatewayConfig::load()?, Arc::new(InMemoryCredentialStore::new()))?;
/// let code = juke_core::PartyCode::parse("AB12C3")?;
///
/// for track in gateway.search_tracks(&code, "daft punk").await? {
///     println!("{} - {}", track.artist_line(), track.name);
/// }
/// gateway.enqueue_track(&code, "spotify:track:0DiWol3AO6WpXZgp0goxAV").await?;
/// ```
pub struct PartyGateway<S: ?Sized> {
    http: Client,
    config: Arc<GatewayConfig>,
    store: Arc<S>,
}

impl<S: ?Sized> Clone for PartyGateway<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CredentialStore + ?Sized> PartyGateway<S> {
    /// Create a gateway over a credential store.
    pub fn new(config: GatewayConfig, store: Arc<S>) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.gateway.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.gateway.connect_timeout_secs))
            .user_agent(format!("Juke/{} (Gateway)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            store,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Host login helper sharing this gateway's HTTP client and config.
    ///
    /// Create one per browser session.
    pub fn host_authorizer(&self) -> HostAuthorizer {
        HostAuthorizer::with_client(self.http.clone(), Arc::clone(&self.config))
    }

    /// Create a party for a freshly authorized host.
    ///
    /// Draws random codes until one has never been used, then stores the
    /// grant as that party's credential.
    pub async fn open_party(&self, grant: TokenGrant) -> Result<Credential> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let credential = grant.clone().into_credential(PartyCode::generate())?;
            if self.store.claim(&credential).await? {
                info!(party_code = %credential.party_code, "Party opened");
                return Ok(credential);
            }
            debug!(party_code = %credential.party_code, "Party code already taken");
        }

        Err(JukeError::storage("could not allocate an unused party code").into())
    }

    /// End a party. Its credential is never used or refreshed again.
    pub async fn close_party(&self, party_code: &PartyCode) -> Result<bool> {
        let retired = self.store.retire(party_code).await?;
        if retired {
            info!(party_code = %party_code, "Party closed");
        }
        Ok(retired)
    }

    /// Execute one call with the party's credential.
    ///
    /// Returns the decoded JSON body, or `None` for empty and non-JSON
    /// bodies. At most one refresh happens per call: proactively when the
    /// token is about to expire, otherwise after a 401, followed by a
    /// single retry.
    pub async fn execute(&self, party_code: &PartyCode, spec: &RequestSpec) -> Result<Option<Value>> {
        let mut credential = self.load_credential(party_code).await?;
        let mut refresh_attempted = false;

        if credential.expires_within(self.config.refresh_margin(), Utc::now()) {
            refresh_attempted = true;
            match self.refresh(party_code, &credential).await {
                Ok(renewed) => credential = renewed,
                Err(e) => warn!(
                    party_code = %party_code,
                    error = %e,
                    "Proactive token refresh failed, continuing with current token"
                ),
            }
        }

        let response = self.send(spec, &credential.access_token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::read_outcome(spec, response).await;
        }

        if refresh_attempted {
            warn!(party_code = %party_code, path = %spec.path, "Access token rejected after refresh");
            return Err(GatewayError::AuthenticationFailed);
        }

        warn!(party_code = %party_code, path = %spec.path, "Access token rejected, refreshing");
        let renewed = self.refresh(party_code, &credential).await?;

        let retry = self.send(spec, &renewed.access_token).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(party_code = %party_code, path = %spec.path, "Access token rejected after refresh");
            return Err(GatewayError::AuthenticationFailed);
        }

        Self::read_outcome(spec, retry).await
    }

    /// Execute a call whose success body must decode into `T`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        party_code: &PartyCode,
        spec: &RequestSpec,
    ) -> Result<T> {
        let body = self.execute(party_code, spec).await?.ok_or_else(|| {
            GatewayError::Parse(format!("Expected a JSON body from {}", spec.path))
        })?;

        serde_json::from_value(body)
            .map_err(|e| GatewayError::Parse(format!("Failed to parse {} response: {}", spec.path, e)))
    }

    /// Exchange the credential's refresh token and persist the result.
    ///
    /// On failure the stored credential is left untouched.
    pub async fn refresh(&self, party_code: &PartyCode, credential: &Credential) -> Result<Credential> {
        let grant = TokenClient::new(&self.http, &self.config)
            .refresh(&credential.refresh_token)
            .await?;

        let renewed = credential.renewed(grant);
        self.store.put_credential(&renewed).await?;

        info!(
            party_code = %party_code,
            expires_at = %renewed.expires_at,
            "Access token refreshed"
        );
        Ok(renewed)
    }

    async fn load_credential(&self, party_code: &PartyCode) -> Result<Credential> {
        self.store
            .get_credential(party_code)
            .await?
            .ok_or_else(|| GatewayError::CredentialNotFound(party_code.clone()))
    }

    async fn send(&self, spec: &RequestSpec, access_token: &str) -> Result<Response> {
        let url = self.config.api_url(&spec.path);
        debug!(method = %spec.method, path = %spec.path, "Calling Web API");

        let mut request = self
            .http
            .request(spec.method.clone(), &url)
            .bearer_auth(access_token);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }

        request = match &spec.body {
            Some(body) => request.json(body),
            // The Web API answers 411 to body-less PUT/POST without a length
            None if spec.method != Method::GET => request.header(CONTENT_LENGTH, "0"),
            None => request,
        };

        Ok(request.send().await?)
    }

    async fn read_outcome(spec: &RequestSpec, response: Response) -> Result<Option<Value>> {
        let status = response.status();

        if status.is_success() {
            return Self::decode_body(spec, response).await;
        }

        let playback = spec.class == EndpointClass::PlaybackControl;
        match status {
            StatusCode::NOT_FOUND if playback => Err(GatewayError::NoActiveDevice),
            StatusCode::FORBIDDEN if playback => Err(GatewayError::EntitlementRequired),
            _ => {
                let message = response.text().await.unwrap_or_default();
                debug!(status = %status, path = %spec.path, "Web API error");
                Err(GatewayError::upstream(status.as_u16(), message))
            }
        }
    }

    async fn decode_body(spec: &RequestSpec, response: Response) -> Result<Option<Value>> {
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));

        let bytes = response.bytes().await?;
        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            GatewayError::Parse(format!("Failed to parse {} response: {}", spec.path, e))
        })
    }
}
