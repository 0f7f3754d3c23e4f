#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::Response,
    Router,
};
use serde_json::Value as JsonValue;
use telegram_relay::config::{Config, DEFAULT_API_BASE_URL};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Nothing listens here; connections are refused immediately.
pub const UNREACHABLE_BASE: &str = "http://127.0.0.1:1";

pub const TEST_TOKEN: &str = "123456:TEST-token";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> JsonValue {
        serde_json::from_slice(&self.body).expect("recorded body is JSON")
    }
}

/// In-process stand-in for the Telegram API. Records every request and
/// answers `{"ok":true,"result":true}` unless a reply was registered.
#[derive(Clone, Default)]
pub struct FakeTelegram {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    replies: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
}

impl FakeTelegram {
    pub async fn start() -> (Self, String) {
        let fake = FakeTelegram::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake");
        let addr = listener.local_addr().expect("fake addr");
        let app = Router::new().fallback(record).with_state(fake.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake telegram");
        });
        (fake, format!("http://{}", addr))
    }

    pub fn reply(&self, path: &str, status: StatusCode, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(fake): State<FakeTelegram>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    fake.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let reply = fake.replies.lock().unwrap().get(uri.path()).cloned();
    let (status, body) =
        reply.unwrap_or((StatusCode::OK, r#"{"ok":true,"result":true}"#.to_string()));
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub fn config(token: Option<&str>, api_base: &str, proxy_base: Option<&str>) -> Config {
    Config::build(
        0,
        token.map(str::to_string),
        api_base.to_string(),
        proxy_base.map(str::to_string),
        vec![],
    )
    .expect("test config")
}

pub fn offline_config() -> Config {
    config(None, DEFAULT_API_BASE_URL, None)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

pub async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let (status, bytes) = send(app, req).await;
    let body = serde_json::from_slice(&bytes).expect("response body is JSON");
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
