//! Shared HTTP transport for the backend services.
//!
//! Every service issues single-shot requests through [`HttpClient`]: no retry,
//! no backoff. The client attaches the bearer token (if the token source has
//! one), checks the HTTP status, then unwraps the backend's JSON envelope.
//!
//! ```text
//! {"code": 200, "chats": [...]}          -> Ok(value)
//! {"code": 404, "error": "not found"}    -> Err(ApiError::Status { 404, .. })
//! HTTP 500 "boom"                        -> Err(ApiError::Status { 500, .. })
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

/// Anything that can hand out a bearer token for outgoing requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token (or none). Used for the profile probe during login.
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        })
    }

    /// Join the base URL, a service prefix (`/chat/`, `api/chat`, ...) and a path.
    pub fn url(&self, prefix: &str, path: &str) -> String {
        join_url(&self.base_url, prefix, path)
    }

    /// `{base}/{prefix}/{id}/{action}` with `id` percent-encoded as a single
    /// path segment, so `/`, `?` or `#` in an id cannot change the route.
    pub fn resource_url(&self, prefix: &str, id: &str, action: &str) -> Result<String, ApiError> {
        let mut url = reqwest::Url::parse(&join_url(&self.base_url, prefix, ""))
            .map_err(|e| ApiError::Validation(format!("invalid API URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Validation(format!("API URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(id)
            .push(action);
        Ok(url.to_string())
    }

    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.execute(self.client.get(url)).await
    }

    pub async fn post_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.execute(self.client.post(url).query(query)).await
    }

    pub async fn delete(&self, url: &str) -> Result<Value, ApiError> {
        self.execute(self.client.delete(url)).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match self.tokens.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        send_json(request).await
    }
}

/// Send a request and return its JSON body with envelope errors already mapped.
pub async fn send_json(request: RequestBuilder) -> Result<Value, ApiError> {
    let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    debug!("Response {} -> {}", response.url(), status);

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !status.is_success() {
        warn!("Backend error: {} - {}", status, body);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value: Value =
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
    check_envelope(&value)?;
    Ok(value)
}

/// Map an envelope that reports a failure (`code >= 400`) to an error.
pub fn check_envelope(value: &Value) -> Result<(), ApiError> {
    let Some(code) = value.get("code").and_then(Value::as_u64) else {
        return Ok(());
    };
    if code < 400 {
        return Ok(());
    }
    let message = value
        .get("error")
        .or_else(|| value.get("detail"))
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();
    warn!("Backend envelope error: {} - {}", code, message);
    Err(ApiError::Status {
        status: u16::try_from(code).unwrap_or(u16::MAX),
        message,
    })
}

/// Decode the payload stored under `key`, or the whole value if the backend
/// sent the payload bare.
pub fn extract<T: DeserializeOwned>(value: Value, key: &str) -> Result<T, ApiError> {
    let payload = match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(format!("{key}: {e}")))
}

/// Pull a readable message out of an error body (JSON `detail`/`error` or raw text).
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() { "no response body".to_string() } else { trimmed.to_string() }
        })
}

pub fn join_url(base: &str, prefix: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let prefix = prefix.trim_matches('/');
    let path = path.trim_start_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => base.to_string(),
        (true, false) => format!("{base}/{path}"),
        (false, true) => format!("{base}/{prefix}"),
        (false, false) => format!("{base}/{prefix}/{path}"),
    }
}
