use std::sync::Arc;

use http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    error::{Error, Result},
    models::update::ChatId,
};

/// Update types the bot subscribes to when registering its webhook.
pub const ALLOWED_UPDATES: [&str; 4] = ["message", "story", "edited_message", "callback_query"];

pub fn echo_text(text: &str) -> String {
    format!("You said: {}", text)
}

/// A decoded Bot API answer. Telegram reports most failures in-band
/// (`{"ok": false, ...}`), so the status is kept next to the body.
#[derive(Debug, Clone)]
pub struct BotApiReply {
    pub status: StatusCode,
    pub body: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { status: u16, response: JsonValue },
    Rejected { status: u16, response: JsonValue },
    Failed { error: String },
}

/// Result of a best-effort echo, published after the webhook was acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReport {
    pub chat_id: ChatId,
    pub text: String,
    #[serde(flatten)]
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered { .. })
    }
}

pub type DeliveryHook = UnboundedSender<DeliveryReport>;

#[derive(Clone)]
pub struct TelegramService {
    client: Client,
    config: Arc<Config>,
    delivery_hook: Option<DeliveryHook>,
}

impl TelegramService {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self {
            client,
            config,
            delivery_hook: None,
        }
    }

    pub fn with_delivery_hook(mut self, hook: DeliveryHook) -> Self {
        self.delivery_hook = Some(hook);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.config.bot_configured()
    }

    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<BotApiReply> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        self.call("sendMessage", Some(&body)).await
    }

    pub async fn set_webhook(&self, webhook_url: &str) -> Result<BotApiReply> {
        let body = json!({
            "url": webhook_url,
            "allowed_updates": ALLOWED_UPDATES,
        });
        self.call("setWebhook", Some(&body)).await
    }

    pub async fn get_webhook_info(&self) -> Result<BotApiReply> {
        self.call("getWebhookInfo", None).await
    }

    /// Sends `You said: {text}` on a background task. The caller never sees
    /// the outcome; it is logged and handed to the delivery hook if one is set.
    pub fn spawn_echo(&self, chat_id: ChatId, text: &str) {
        let service = self.clone();
        let reply_text = echo_text(text);
        tokio::spawn(async move {
            let report = service.deliver(chat_id, reply_text).await;
            if let Some(hook) = &service.delivery_hook {
                let _ = hook.send(report);
            }
        });
    }

    async fn deliver(&self, chat_id: ChatId, text: String) -> DeliveryReport {
        let outcome = match self.send_message(&chat_id, &text).await {
            Ok(reply) if reply.status.is_success() => {
                info!(chat_id = %chat_id, "Echo message sent");
                DeliveryOutcome::Delivered {
                    status: reply.status.as_u16(),
                    response: reply.body,
                }
            }
            Ok(reply) => {
                warn!(chat_id = %chat_id, status = %reply.status, response = %reply.body, "Telegram rejected echo message");
                DeliveryOutcome::Rejected {
                    status: reply.status.as_u16(),
                    response: reply.body,
                }
            }
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "Error sending echo message");
                DeliveryOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        DeliveryReport {
            chat_id,
            text,
            outcome,
        }
    }

    async fn call(&self, method: &str, body: Option<&JsonValue>) -> Result<BotApiReply> {
        let url = self
            .config
            .bot_method_url(method)
            .ok_or_else(|| Error::Config("BOT_TOKEN not configured".to_string()))?;

        let request = match body {
            Some(body) => self.client.post(&url).json(body),
            None => self.client.get(&url),
        };
        // The URL carries the bot token; keep it out of errors and logs.
        let response = request.send().await.map_err(|e| Error::Reqwest(e.without_url()))?;
        let status = response.status();
        let body = response
            .json::<JsonValue>()
            .await
            .map_err(|e| {
                Error::Upstream(format!(
                    "Invalid response from Telegram {}: {}",
                    method,
                    e.without_url()
                ))
            })?;

        Ok(BotApiReply { status, body })
    }
}
