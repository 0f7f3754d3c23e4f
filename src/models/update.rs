use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Chat identifiers are integers for Telegram, but channel usernames
/// (`@channel`) are accepted by the Bot API as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramUser {
    #[serde(default, deserialize_with = "or_none")]
    pub username: Option<String>,
}

/// Only `chat.id` is load-bearing; every other field degrades to `None`
/// instead of rejecting the message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<JsonValue>,
    #[serde(default, deserialize_with = "or_none")]
    pub from: Option<TelegramUser>,
}

fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl TelegramMessage {
    /// Text worth echoing. Empty strings, `0`, `false` and `null` are
    /// skipped; other non-string values are echoed in their JSON form.
    pub fn echo_text(&self) -> Option<String> {
        match self.text.as_ref()? {
            JsonValue::Null | JsonValue::Bool(false) => None,
            JsonValue::String(s) if s.is_empty() => None,
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.from.as_ref().and_then(|u| u.username.as_deref())
    }
}

/// One incoming update, classified by the first populated top-level key.
#[derive(Debug, Clone)]
pub enum UpdateKind {
    Message(TelegramMessage),
    /// `message` was present but lacked the fields needed to answer it.
    MalformedMessage(JsonValue),
    Story(JsonValue),
    EditedMessage(JsonValue),
    CallbackQuery(JsonValue),
    Unrecognized,
}

impl UpdateKind {
    pub fn classify(update: &JsonValue) -> Self {
        if let Some(message) = present(update, "message") {
            return match serde_json::from_value::<TelegramMessage>(message.clone()) {
                Ok(msg) => UpdateKind::Message(msg),
                Err(_) => UpdateKind::MalformedMessage(message.clone()),
            };
        }
        if let Some(story) = present(update, "story") {
            return UpdateKind::Story(story.clone());
        }
        if let Some(edited) = present(update, "edited_message") {
            return UpdateKind::EditedMessage(edited.clone());
        }
        if let Some(query) = present(update, "callback_query") {
            return UpdateKind::CallbackQuery(query.clone());
        }
        UpdateKind::Unrecognized
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpdateKind::Message(_) | UpdateKind::MalformedMessage(_) => "message",
            UpdateKind::Story(_) => "story",
            UpdateKind::EditedMessage(_) => "edited_message",
            UpdateKind::CallbackQuery(_) => "callback_query",
            UpdateKind::Unrecognized => "unrecognized",
        }
    }
}

fn present<'a>(update: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    update.get(key).filter(|v| !v.is_null())
}
