use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    dto::webhook_dto::SetWebhookPayload,
    error::{Error, Result},
    extract::lenient_json,
    models::update::UpdateKind,
    AppState,
};

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Telegram Bot Server is running!",
        "status": "success",
        "endpoints": {
            "webhook": "/webhook",
            "health": "/health",
            "setWebhook": "/set-webhook",
            "webhookInfo": "/webhook-info",
        },
    }))
}

/// Telegram only needs a fast 200; anything the update triggers happens
/// after the acknowledgment and never changes it.
pub async fn handle_webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let update: JsonValue = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Ignoring webhook body that is not JSON");
            return StatusCode::OK;
        }
    };
    debug!(payload = %update, "Received webhook");

    match UpdateKind::classify(&update) {
        UpdateKind::Message(message) => {
            info!(
                chat_id = %message.chat.id,
                text = ?message.text,
                from = ?message.username(),
                "Message received"
            );
            if let Some(text) = message.echo_text() {
                state.telegram_service.spawn_echo(message.chat.id.clone(), &text);
            }
        }
        UpdateKind::MalformedMessage(raw) => {
            warn!(message = %raw, "Message update without a usable chat id");
        }
        UpdateKind::Story(story) => info!(story = %story, "Story update received"),
        UpdateKind::EditedMessage(edited) => info!(message = %edited, "Edited message"),
        UpdateKind::CallbackQuery(query) => info!(query = %query, "Callback query"),
        UpdateKind::Unrecognized => debug!("Unrecognized update ignored"),
    }

    StatusCode::OK
}

pub async fn set_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<JsonValue>)> {
    require_bot(&state)?;

    let payload: SetWebhookPayload = serde_json::from_value(lenient_json(&body))?;
    payload.validate()?;
    let webhook_url = payload.webhook_url.unwrap_or_default();

    info!(url = %webhook_url, "Registering Telegram webhook");
    let reply = state.telegram_service.set_webhook(&webhook_url).await?;
    if !reply.status.is_success() {
        warn!(status = %reply.status, response = %reply.body, "Telegram refused webhook registration");
    }

    Ok((StatusCode::OK, Json(reply.body)))
}

pub async fn webhook_info(State(state): State<AppState>) -> Result<(StatusCode, Json<JsonValue>)> {
    require_bot(&state)?;
    let reply = state.telegram_service.get_webhook_info().await?;
    Ok((StatusCode::OK, Json(reply.body)))
}

fn require_bot(state: &AppState) -> Result<()> {
    if state.telegram_service.is_configured() {
        Ok(())
    } else {
        Err(Error::Config("BOT_TOKEN not configured".to_string()))
    }
}
