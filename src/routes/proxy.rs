use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    error::Result,
    services::proxy_service::{
        ForwardedRequest, DELETE_STORY_METHOD, LIST_STORIES_METHOD, SEND_STORY_METHOD,
    },
    AppState,
};

pub const TELEGRAM_PREFIX: &str = "/api/telegram/";

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Telegram API proxy is running!",
        "status": "success",
        "endpoints": {
            "proxy": "/api/telegram/*",
            "sendStory": "/api/story/send",
            "listStories": "/api/story/list",
            "deleteStory": "/api/story/:id",
            "health": "/health",
        },
    }))
}

/// `ANY /api/telegram/*` → `<proxy-base>/<suffix>`.
pub async fn forward_telegram(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    // Raw path keeps percent-encoding exactly as the client sent it.
    let suffix = uri
        .path()
        .strip_prefix(TELEGRAM_PREFIX)
        .unwrap_or_default()
        .to_string();
    relay(&state, inbound(method, suffix, &uri, headers, body)).await
}

pub async fn send_story(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let req = inbound(method, SEND_STORY_METHOD.to_string(), &uri, headers, body);
    relay(&state, req).await
}

pub async fn list_stories(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let req = inbound(method, LIST_STORIES_METHOD.to_string(), &uri, headers, body);
    relay(&state, req).await
}

pub async fn delete_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let req = inbound(method, DELETE_STORY_METHOD.to_string(), &uri, headers, body)
        .append_query("story_id", &story_id);
    relay(&state, req).await
}

fn inbound(method: Method, suffix: String, uri: &Uri, headers: HeaderMap, body: Bytes) -> ForwardedRequest {
    ForwardedRequest {
        method,
        suffix,
        query: uri.query().map(str::to_string),
        headers,
        body,
    }
}

async fn relay(state: &AppState, req: ForwardedRequest) -> Result<Response> {
    let reply = state.proxy_service.forward(req).await?;
    Ok((reply.status, Json(reply.body)).into_response())
}
