//! Shared HTTP plumbing for the typed clients.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use vitrine_auth::SessionStore;

use crate::{ClientConfig, ClientError, ClientResult};

/// Thin wrapper over `reqwest::Client` bound to one base URL.
///
/// When a [`SessionStore`] is attached, the stored access token is sent as a
/// bearer token on every request. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Option<SessionStore>,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            config,
            session: None,
        })
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get(&self, path: &str) -> ClientResult<Value> {
        let resp = self.execute(self.request(Method::GET, path)?).await?;
        read_json(resp).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let resp = self.execute(self.request(Method::POST, path)?.json(body)).await?;
        read_json(resp).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let resp = self.execute(self.request(Method::PUT, path)?.json(body)).await?;
        read_json(resp).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        let request_id = Uuid::now_v7();
        tracing::debug!(method = method.as_str(), path, %request_id, "api request");

        let mut req = self
            .http
            .request(method, url)
            .header("x-request-id", request_id.to_string());

        if let Some(token) = self.session.as_ref().and_then(|s| s.load().token) {
            req = req.bearer_auth(token.expose());
        }
        Ok(req)
    }

    async fn execute(&self, req: RequestBuilder) -> ClientResult<Response> {
        let resp = req.send().await.map_err(|e| {
            tracing::warn!(error = %e, "api request failed");
            ClientError::Network(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::warn!(status = status.as_u16(), %message, "api returned error status");
        Err(ClientError::from_status(status.as_u16(), message))
    }
}

/// Decode a JSON value into `T`, reporting mismatches as parse errors.
pub fn decode<T: DeserializeOwned>(what: &str, value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse(format!("{what}: {e}")))
}

async fn read_json(resp: Response) -> ClientResult<Value> {
    let body = resp
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| ClientError::Parse(format!("response body: {e}")))
}

/// Best-effort human message from an error body.
///
/// Servers answer with a bare JSON string, an object carrying `message` or
/// `error`, plain text, or nothing at all.
fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        match &value {
            Value::String(s) => return s.clone(),
            Value::Object(map) => {
                for key in ["message", "error"] {
                    if let Some(Value::String(s)) = map.get(key) {
                        return s.clone();
                    }
                }
            }
            _ => {}
        }
    }
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
