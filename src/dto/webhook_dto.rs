use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SetWebhookPayload {
    #[serde(rename = "webhookUrl")]
    #[validate(
        required(message = "webhookUrl is required"),
        length(min = 1, message = "webhookUrl is required")
    )]
    pub webhook_url: Option<String>,
}
