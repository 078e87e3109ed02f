//! Request/response transport.
//!
//! Entity services talk to the API through the [`Transport`] trait so they can
//! run against a real HTTP endpoint or, with the `test-util` feature, a
//! scripted `MockTransport`.

#[cfg(any(test, feature = "test-util"))]
use std::collections::{HashMap, VecDeque};
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::ServiceError;

/// One call against the REST API. `path` is relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PATCH,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }
}

/// Status and decoded JSON body of a response. Empty bodies decode to `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends API requests.
///
/// Implementations return `Err` only when no response was received. Non-2xx
/// responses are returned as-is and mapped by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ServiceError>;
}

/// API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ServiceError> {
        let url = self.url(&request.path);
        debug!(method = %request.method, url = %url, "Sending API request");

        let mut builder = self.client.request(request.method, &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Transport(format!("Request timeout after {}s", self.timeout_secs))
            } else {
                ServiceError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok(ApiResponse { status, body })
    }
}

/// A scripted reply for [`MockTransport`].
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub enum MockReply {
    Status(u16, Value),
    /// No response at all, as if the host were down.
    Unreachable,
}

/// Transport test double.
///
/// Replies are queued per (method, path) and consumed in order. A request with
/// no queued reply fails as unreachable. Every request is logged.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<MockReply>>>,
    log: Mutex<Vec<ApiRequest>>,
    latency: Option<Duration>,
}

#[cfg(any(test, feature = "test-util"))]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every reply, keeping the call in flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues a reply for `method path`.
    pub fn on(self, method: Method, path: impl Into<String>, reply: MockReply) -> Self {
        self.push(method, path, reply);
        self
    }

    pub fn ok(self, method: Method, path: impl Into<String>, body: Value) -> Self {
        self.on(method, path, MockReply::Status(200, body))
    }

    pub fn push(&self, method: Method, path: impl Into<String>, reply: MockReply) {
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        replies
            .entry((method, path.into()))
            .or_default()
            .push_back(reply);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Number of requests received for `method path`.
    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    fn next_reply(&self, method: &Method, path: &str) -> Option<MockReply> {
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        replies
            .get_mut(&(method.clone(), path.to_string()))
            .and_then(VecDeque::pop_front)
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ServiceError> {
        if let Ok(mut log) = self.log.lock() {
            log.push(request.clone());
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_reply(&request.method, &request.path) {
            Some(MockReply::Status(status, body)) => Ok(ApiResponse { status, body }),
            Some(MockReply::Unreachable) | None => Err(ServiceError::Transport(format!(
                "connection refused: {} {}",
                request.method, request.path
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_http_transport_trims_base_url() {
        let transport = HttpTransport::new(&ApiConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080/api");
        assert_eq!(
            transport.url("/products/7"),
            "http://localhost:8080/api/products/7"
        );
    }

    #[test]
    fn test_response_success_range() {
        let ok = ApiResponse {
            status: 204,
            body: Value::Null,
        };
        let missing = ApiResponse {
            status: 404,
            body: Value::Null,
        };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[tokio::test]
    async fn test_mock_replies_in_order() {
        let transport = MockTransport::new()
            .ok(Method::GET, "/products", json!([]))
            .on(
                Method::GET,
                "/products",
                MockReply::Status(500, json!({"message": "boom"})),
            );

        let first = assert_ok!(transport.send(ApiRequest::get("/products")).await);
        assert_eq!(first.status, 200);

        let second = transport.send(ApiRequest::get("/products")).await.unwrap();
        assert_eq!(second.status, 500);

        let third = transport.send(ApiRequest::get("/products")).await;
        assert!(matches!(third, Err(ServiceError::Transport(_))));

        assert_eq!(transport.count(&Method::GET, "/products"), 3);
    }

    #[tokio::test]
    async fn test_mock_unreachable() {
        let transport =
            MockTransport::new().on(Method::DELETE, "/events/3", MockReply::Unreachable);

        assert_err!(transport.send(ApiRequest::delete("/events/3")).await);
        assert_eq!(transport.requests()[0].method, Method::DELETE);
    }
}
