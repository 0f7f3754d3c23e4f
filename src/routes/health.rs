use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    utils::time::{now, to_iso},
    AppState,
};

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "status": "healthy",
        "timestamp": to_iso(now()),
        "bot_configured": state.config.bot_configured(),
    });
    (StatusCode::OK, Json(body))
}
