use std::sync::Arc;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use reqwest::Client;
use serde_json::Value as JsonValue;
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Upstream story methods behind the dedicated `/api/story/*` routes.
pub const SEND_STORY_METHOD: &str = "sendStory";
pub const LIST_STORIES_METHOD: &str = "getStories";
pub const DELETE_STORY_METHOD: &str = "deleteStory";

/// Connection-scoped headers plus the ones the client must recompute.
const NEVER_FORWARDED: [&str; 11] = [
    "host",
    "connection",
    "keep-alive",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "proxy-authorization",
    "proxy-authenticate",
    "content-length",
    "accept-encoding",
];

/// An inbound request, reduced to what gets replayed upstream.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    /// Path below the proxy base, e.g. `getMe` or `sendStory`.
    pub suffix: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ForwardedRequest {
    pub fn append_query(mut self, key: &str, value: &str) -> Self {
        let pair: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        self.query = Some(match self.query.take().filter(|q| !q.is_empty()) {
            Some(existing) => format!("{}&{}", existing, pair),
            None => pair,
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: JsonValue,
}

#[derive(Clone)]
pub struct ProxyService {
    client: Client,
    base_url: String,
    target_host: Option<HeaderValue>,
    strip_headers: Arc<Vec<String>>,
}

impl ProxyService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            base_url: config.proxy_base_url.clone(),
            target_host: target_host(&config.proxy_base_url),
            strip_headers: Arc::new(config.proxy_strip_headers.clone()),
        }
    }

    pub fn target_url(&self, suffix: &str, query: Option<&str>) -> String {
        let mut url = format!("{}/{}", self.base_url, suffix.trim_start_matches('/'));
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(q);
        }
        url
    }

    /// Replays the request against the upstream and relays its status and
    /// JSON body untouched.
    pub async fn forward(&self, req: ForwardedRequest) -> Result<UpstreamReply> {
        let url = self.target_url(&req.suffix, req.query.as_deref());
        let mut headers = forwardable_headers(&req.headers, &self.strip_headers);
        if let Some(host) = &self.target_host {
            headers.insert(header::HOST, host.clone());
        }

        tracing::debug!(method = %req.method, suffix = %req.suffix, "Forwarding request upstream");

        let mut builder = self.client.request(req.method, &url).headers(headers);
        if !req.body.is_empty() {
            builder = builder.body(req.body);
        }

        // Proxy bases usually embed the bot token.
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Reqwest(e.without_url()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Reqwest(e.without_url()))?;
        let body = serde_json::from_slice::<JsonValue>(&bytes)
            .map_err(|e| Error::Upstream(format!("Invalid JSON from upstream: {}", e)))?;

        Ok(UpstreamReply { status, body })
    }
}

/// Copies end-to-end headers, dropping hop-by-hop ones and anything listed
/// in `strip` (lower-case names).
pub fn forwardable_headers(inbound: &HeaderMap, strip: &[String]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        let name_str = name.as_str();
        if NEVER_FORWARDED.contains(&name_str) || strip.iter().any(|s| s == name_str) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

fn target_host(base_url: &str) -> Option<HeaderValue> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    HeaderValue::from_str(&authority).ok()
}
