//! Description of a single Web API call.

use reqwest::Method;
use serde_json::Value;

/// How error statuses of an endpoint are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Plain resource: every non-2xx other than 401 is `Upstream`
    Resource,
    /// `/me/player/*`: 404 means no active device, 403 means the plan lacks the feature
    PlaybackControl,
}

/// Target, method and payload of a call made through the gateway.
///
/// # Example
///
/// ```
/// use juke_gateway::RequestSpec;
///
/// let spec = RequestSpec::post("/me/player/queue")
///     .with_query("uri", "spotify:track:4uLU6hMCjMI75M1A2tKUQC")
///     .playback_control();
/// assert_eq!(spec.path, "/me/player/queue");
/// ```
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Path under the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub class: EndpointClass,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            class: EndpointClass::Resource,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Append a query parameter (escaped when sent)
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the endpoint as a playback-control endpoint
    pub fn playback_control(mut self) -> Self {
        self.class = EndpointClass::PlaybackControl;
        self
    }
}
