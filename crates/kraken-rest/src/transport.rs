//! HTTP transport abstraction
//!
//! This module provides a trait-based abstraction over the HTTP POST that
//! carries every private request, enabling unit testing of signing, envelope
//! handling and pagination without real network calls.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{RestError, RestResult, TransportError};
use crate::types::ApiResponse;

/// Longest response body kept in a [`TransportError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Raw HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into a transport error
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            return Ok(self);
        }
        let mut body = String::from_utf8_lossy(&self.body).into_owned();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(TransportError::Status {
            status: self.status,
            body,
        })
    }
}

/// Trait for the HTTP layer under authenticated requests
///
/// Implementations POST `body` to `url` with the given headers and return
/// the raw response; status handling and JSON decoding happen above.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a form-encoded body
    async fn post_form(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<HttpResponse, TransportError>;
}

/// Real HTTP transport using reqwest
///
/// One pooled `reqwest::Client` is shared by every request made through the
/// transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, headers, body), fields(len = body.len()))]
    async fn post_form(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        debug!(status, len = body.len(), "Received HTTP response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

impl ReqwestTransport {
    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Http(err)
        }
    }
}

/// Decode a response body as a Kraken envelope and extract `result` as `T`
///
/// Undecodable JSON and a `result` that does not fit `T` are protocol
/// errors; a non-empty `error` array is an exchange error.
pub fn parse_envelope<T: DeserializeOwned>(body: &[u8]) -> RestResult<T> {
    let envelope: ApiResponse<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| RestError::Protocol(format!("invalid response envelope: {}", e)))?;

    let result = envelope.into_result()?;
    serde_json::from_value(result)
        .map_err(|e| RestError::Protocol(format!("unexpected result shape: {}", e)))
}

/// Recorded request captured by [`MockTransport`]
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Target URL
    pub url: String,
    /// Headers as sent
    pub headers: Vec<(&'static str, String)>,
    /// Form-encoded body
    pub body: String,
    /// Time the request was issued
    pub at: tokio::time::Instant,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordedRequest {
    /// Look up a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a form field in the body
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

/// Mock transport for testing
///
/// Allows injecting predefined responses and capturing sent requests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<HttpResponse, TransportError>>>,
    requests: parking_lot::Mutex<Vec<RecordedRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a 200 response with the given JSON body
    pub fn push_json(&self, body: impl Into<String>) {
        self.push_response(HttpResponse::new(200, body.into()));
    }

    /// Add a raw response
    pub fn push_response(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Simulate a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Requests captured so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests captured so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_form(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
            at: tokio::time::Instant::now(),
        });

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_result() {
        let result: serde_json::Value =
            parse_envelope(br#"{"error": [], "result": {"ZUSD": "100.0"}}"#).unwrap();
        assert_eq!(result, serde_json::json!({"ZUSD": "100.0"}));
    }

    #[test]
    fn test_parse_envelope_exchange_error() {
        let err = parse_envelope::<serde_json::Value>(br#"{"error": ["EOrder:Insufficient funds"]}"#)
            .unwrap_err();
        match err {
            RestError::Exchange { errors, error } => {
                assert_eq!(errors, vec!["EOrder:Insufficient funds".to_string()]);
                assert!(error.is_insufficient_funds());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_envelope_protocol_errors() {
        for body in [
            &br#"{"error": [], "result": null}"#[..],
            &b"{}"[..],
            &b"<html>502</html>"[..],
        ] {
            let err = parse_envelope::<serde_json::Value>(body).unwrap_err();
            assert!(matches!(err, RestError::Protocol(_)), "body {:?}", body);
        }
    }

    #[test]
    fn test_parse_envelope_wrong_result_shape() {
        let err = parse_envelope::<Vec<String>>(br#"{"error": [], "result": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, RestError::Protocol(_)));
    }

    #[test]
    fn test_error_for_status() {
        assert!(HttpResponse::new(200, "ok").error_for_status().is_ok());

        let err = HttpResponse::new(503, "unavailable").error_for_status().unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 503, .. }));
    }

    #[test]
    fn test_error_for_status_truncates_body() {
        let body = "x".repeat(MAX_ERROR_BODY * 2);
        match HttpResponse::new(500, body).error_for_status() {
            Err(TransportError::Status { body, .. }) => assert_eq!(body.len(), MAX_ERROR_BODY),
            other => panic!("unexpected: {:?}", other.map(|r| r.status)),
        }
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let mock = MockTransport::new();
        mock.push_json(r#"{"error": [], "result": {}}"#);

        let response = mock
            .post_form(
                "https://mock.test/0/private/Balance",
                &[("API-Key", "key".to_string())],
                "nonce=1".to_string(),
            )
            .await
            .unwrap();
        assert!(response.is_success());

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("API-Key"), Some("key"));
        assert_eq!(requests[0].field("nonce"), Some("1"));
    }

    #[tokio::test]
    async fn test_mock_transport_exhausted() {
        let mock = MockTransport::new();
        let result = mock.post_form("https://mock.test", &[], String::new()).await;
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
