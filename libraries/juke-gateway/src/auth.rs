//! Host login (authorization code + PKCE) and the token endpoint.

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::types::{TokenErrorResponse, TokenResponse};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use juke_core::{JukeError, TokenGrant};
use rand::Rng;
use reqwest::{Client, Response};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
const STATE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const VERIFIER_LEN: usize = 64;
const STATE_LEN: usize = 16;

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// PKCE verifier and its S256 challenge.
#[derive(Clone)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
}

impl PkceChallenge {
    /// Generate a fresh random verifier
    pub fn generate() -> Self {
        Self::from_verifier(random_string(VERIFIER_CHARSET, VERIFIER_LEN))
    }

    /// Derive the challenge for a known verifier
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

/// Token endpoint client.
pub(crate) struct TokenClient<'a> {
    http: &'a Client,
    config: &'a GatewayConfig,
}

impl<'a> TokenClient<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a GatewayConfig) -> Self {
        Self { http, config }
    }

    /// Exchange an authorization code for the host's first tokens.
    pub(crate) async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenGrant> {
        debug!(url = %self.config.token_url(), "Exchanging authorization code");

        let response = self
            .post_form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.spotify.redirect_uri.as_str()),
                ("client_id", self.config.spotify.client_id.as_str()),
                ("code_verifier", code_verifier),
            ])
            .await?;

        let status = response.status();
        if status.is_success() {
            Self::parse_grant(response).await
        } else {
            let message = Self::error_text(response).await;
            warn!(status = %status, error = %message, "Authorization code exchange rejected");
            Err(GatewayError::upstream(status.as_u16(), message))
        }
    }

    /// Mint a new access token from a refresh token.
    ///
    /// Every failure, transport included, is reported as `RefreshFailed`.
    pub(crate) async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant> {
        debug!(url = %self.config.token_url(), "Refreshing access token");

        let response = self
            .post_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.spotify.client_id.as_str()),
            ])
            .await
            .map_err(|e| GatewayError::RefreshFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Self::parse_grant(response)
                .await
                .map_err(|e| GatewayError::RefreshFailed(e.to_string()))
        } else {
            let message = Self::error_text(response).await;
            Err(GatewayError::RefreshFailed(format!("{}: {}", status, message)))
        }
    }

    async fn post_form(&self, form: &[(&str, &str)]) -> Result<Response> {
        Ok(self
            .http
            .post(self.config.token_url())
            .form(form)
            .send()
            .await?)
    }

    async fn parse_grant(response: Response) -> Result<TokenGrant> {
        let token: TokenResponse = response.json().await.map_err(|e| {
            GatewayError::Parse(format!("Failed to parse token response: {}", e))
        })?;

        TokenGrant::from_expires_in(
            token.access_token,
            token.refresh_token,
            token.expires_in,
            Utc::now(),
        )
        .map_err(|e| GatewayError::Parse(format!("Invalid token response: {}", e)))
    }

    async fn error_text(response: Response) -> String {
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<TokenErrorResponse>(&text) {
            Ok(body) => match body.error_description {
                Some(description) => format!("{} ({})", body.error, description),
                None => body.error,
            },
            Err(_) => text,
        }
    }
}

/// Where to send the host to log in.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    /// Opaque value the provider echoes back on the callback
    pub state: String,
}

struct PendingAuthorization {
    state: String,
    pkce: PkceChallenge,
}

#[derive(Default)]
struct AuthorizationSession {
    pending: Option<PendingAuthorization>,
    consumed_codes: HashSet<String>,
}

/// Host login for one browser session.
///
/// Holds the PKCE verifier between the redirect and the callback, and
/// remembers every authorization code it has exchanged so a replayed
/// callback fails locally.
pub struct HostAuthorizer {
    http: Client,
    config: Arc<GatewayConfig>,
    session: Mutex<AuthorizationSession>,
}

impl HostAuthorizer {
    pub(crate) fn with_client(http: Client, config: Arc<GatewayConfig>) -> Self {
        Self {
            http,
            config,
            session: Mutex::new(AuthorizationSession::default()),
        }
    }

    /// Start a login: remember a new PKCE verifier and build the authorize URL.
    ///
    /// Calling this again replaces the pending login.
    pub async fn begin_authorization(&self) -> Result<AuthorizationRequest> {
        let pkce = PkceChallenge::generate();
        let state = random_string(STATE_CHARSET, STATE_LEN);
        let scope = self.config.spotify.scopes.join(" ");

        let url = url::Url::parse_with_params(
            &self.config.authorize_url(),
            &[
                ("client_id", self.config.spotify.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.spotify.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", pkce.challenge.as_str()),
            ],
        )
        .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        self.session.lock().await.pending = Some(PendingAuthorization {
            state: state.clone(),
            pkce,
        });

        debug!("Host authorization started");
        Ok(AuthorizationRequest {
            url: url.into(),
            state,
        })
    }

    /// Finish a login with the code from the callback.
    ///
    /// A code is exchanged at most once per authorizer; repeats fail with
    /// `AuthorizationCodeReused` before any request is made.
    pub async fn complete_authorization(&self, code: &str, state: Option<&str>) -> Result<TokenGrant> {
        let code = code.trim();
        if code.is_empty() {
            return Err(JukeError::invalid_input("authorization code is empty").into());
        }

        let (verifier, pending_state) = {
            let mut session = self.session.lock().await;
            if session.consumed_codes.contains(code) {
                warn!("Rejected reused authorization code");
                return Err(GatewayError::AuthorizationCodeReused);
            }

            let pending = session
                .pending
                .as_ref()
                .ok_or(GatewayError::AuthorizationNotStarted)?;
            if state.is_some_and(|s| s != pending.state) {
                warn!("Authorization callback state does not match pending login");
                return Err(GatewayError::AuthorizationStateMismatch);
            }
            let started = (pending.pkce.verifier.clone(), pending.state.clone());

            // Consumed before the exchange so a concurrent duplicate fails too
            session.consumed_codes.insert(code.to_string());
            started
        };

        let grant = TokenClient::new(&self.http, &self.config)
            .exchange_code(code, &verifier)
            .await?;

        {
            // A login begun during the exchange stays pending
            let mut session = self.session.lock().await;
            if session
                .pending
                .as_ref()
                .is_some_and(|p| p.state == pending_state)
            {
                session.pending = None;
            }
        }
        info!(expires_at = %grant.expires_at, "Host authorization completed");
        Ok(grant)
    }
}
