//! Common test utilities and fixtures for integration tests
//!
//! Response bodies follow the shapes returned by Kraken's private REST API.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use kraken_rest::{
    ClientConfig, Credentials, HttpResponse, HttpTransport, KrakenRestClient, TransportError,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// API key used by every test client
pub const API_KEY: &str = "integration_key";

/// Base64 secret used by every test client
pub const SECRET: &str = "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

/// Sample `/0/private/Balance` response
pub const BALANCE_RESPONSE: &str = r#"{
    "error": [],
    "result": {
        "ZUSD": "2970172.7962",
        "XXBT": "0.0000000000",
        "XETH": "2.5000000000"
    }
}"#;

/// Sample `/0/private/BalanceEx` response
pub const BALANCE_EX_RESPONSE: &str = r#"{
    "error": [],
    "result": {
        "ZUSD": {"balance": "25435.21", "hold_trade": "8249.76"},
        "XXBT": {"balance": "1.2435", "hold_trade": "0.8423"}
    }
}"#;

/// Sample `/0/private/AddOrder` response
pub const ADD_ORDER_RESPONSE: &str = r#"{
    "error": [],
    "result": {
        "descr": {"order": "buy 2.12340000 XBTUSD @ market"},
        "txid": ["OUF4EM-FRGI2-MQMWZD"]
    }
}"#;

/// Sample `/0/private/Withdraw` response
pub const WITHDRAW_RESPONSE: &str = r#"{
    "error": [],
    "result": {"refid": "FTQcuak-V6Za8qrWnhzTx67yYHz8Tg"}
}"#;

/// Envelope carrying an invalid nonce error
pub const INVALID_NONCE_RESPONSE: &str = r#"{"error": ["EAPI:Invalid nonce"]}"#;

/// One trade history record
pub fn trade_json(ordertxid: &str) -> Value {
    json!({
        "ordertxid": ordertxid,
        "postxid": "TKH2SE-M7IF5-CFI7LT",
        "pair": "XXBTZUSD",
        "time": 1688667796.8802,
        "type": "buy",
        "ordertype": "market",
        "price": "30010.00000",
        "cost": "600.20000",
        "fee": "0.00000",
        "vol": "0.02000000",
        "margin": "0.00000",
        "misc": "",
        "trade_id": 40274859,
        "maker": false
    })
}

/// A `/0/private/TradesHistory` page holding `ids`
pub fn history_page(ids: &[String], count: u64) -> String {
    let trades: serde_json::Map<String, Value> = ids
        .iter()
        .map(|id| (id.clone(), trade_json(&format!("O-{id}"))))
        .collect();
    json!({"error": [], "result": {"trades": trades, "count": count}}).to_string()
}

/// Request captured by [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct Captured {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
    pub at: tokio::time::Instant,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    pub fn nonce(&self) -> u64 {
        self.field("nonce").unwrap().parse().unwrap()
    }

    pub fn path(&self) -> &str {
        self.url.trim_start_matches(BASE_URL)
    }
}

/// Base URL of the scripted exchange
pub const BASE_URL: &str = "https://scripted.test";

/// In-memory transport replaying scripted responses in order
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    captured: Mutex<Vec<Captured>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, body: impl Into<String>) -> &Self {
        self.reply_status(200, body)
    }

    pub fn reply_status(&self, status: u16, body: impl Into<String>) -> &Self {
        self.script
            .lock()
            .push_back(Ok(HttpResponse::new(status, body.into())));
        self
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.script.lock().push_back(Err(error));
        self
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_form(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        self.captured.lock().push(Captured {
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
            at: tokio::time::Instant::now(),
        });
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into())))
    }
}

/// Test credentials
pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, SECRET).unwrap()
}

/// Client wired to `transport` with default pacing
pub fn client(transport: &Arc<ScriptedTransport>) -> KrakenRestClient {
    client_with(transport, ClientConfig::new())
}

/// Client wired to `transport` with a custom configuration
pub fn client_with(transport: &Arc<ScriptedTransport>, config: ClientConfig) -> KrakenRestClient {
    let config = config.with_credentials(credentials()).with_base_url(BASE_URL);
    KrakenRestClient::with_transport(config, transport.clone())
}

// =============================================================================
// Local HTTP servers
// =============================================================================

/// Raw HTTP request read off a socket
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawRequest {
    fn parse(raw: &str) -> Self {
        let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw, ""));
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        Self {
            request_line,
            headers,
            body: body.to_string(),
        }
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .split("\r\n")
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8(buf).unwrap()
}

/// Serve one request with a 200 JSON `body`; the handle yields the request
pub async fn serve_once(body: &'static str) -> (String, JoinHandle<RawRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let raw = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        RawRequest::parse(&raw)
    });

    (format!("http://{addr}"), handle)
}

/// Accept connections and never answer them
pub async fn serve_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}")
}

/// Client over the real reqwest transport
pub fn http_client(base_url: &str, timeout_secs: u64) -> KrakenRestClient {
    let config = ClientConfig::new()
        .with_credentials(credentials())
        .with_base_url(base_url)
        .with_timeout(timeout_secs);
    KrakenRestClient::with_config(config).unwrap()
}
