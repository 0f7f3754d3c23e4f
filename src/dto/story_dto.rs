use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

/// `null`, `false`, `0` and `""` count as not supplied.
fn truthy(value: JsonValue) -> Option<JsonValue> {
    let supplied = match &value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    };
    supplied.then_some(value)
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<JsonValue>::deserialize(deserializer)?.and_then(truthy))
}

/// Accepts `"u1"`, `42` or anything else a client sends for text-like
/// fields; clients are not consistent about quoting numeric ids.
fn deserialize_string_flexible<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_present(deserializer)?.map(|v| match v {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }))
}

/// Seconds as a number or numeric string; anything else means "use the default".
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(JsonValue::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(seconds.filter(|d| *d > 0))
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadStoryPayload {
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "userId is required"))]
    pub user_id: Option<String>,
    /// Passed back as sent: a file id, a URL or a structured descriptor.
    #[serde(default, deserialize_with = "deserialize_present")]
    #[validate(required(message = "media is required"))]
    pub media: Option<JsonValue>,
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    pub privacy: Option<String>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ViewStoryPayload {
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "storyId is required"))]
    pub story_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "viewerId is required"))]
    pub viewer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReactStoryPayload {
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "storyId is required"))]
    pub story_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "userId is required"))]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "reaction is required"))]
    pub reaction: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStoryPayload {
    #[serde(default, deserialize_with = "deserialize_string_flexible")]
    #[validate(required(message = "userId is required"))]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStoriesQuery {
    pub user_id: Option<String>,
}

/// `{ success: true, message?, data }`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<JsonValue>,
    pub caption: String,
    pub privacy: String,
    pub duration: u32,
    pub created_at: String,
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    pub story_id: String,
    pub viewer_id: String,
    pub viewed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryReaction {
    pub story_id: String,
    pub user_id: String,
    pub reaction: String,
    pub reacted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedStory {
    pub story_id: String,
    pub user_id: String,
    pub deleted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryList {
    pub user_id: Option<String>,
    pub stories: Vec<Story>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryViewers {
    pub story_id: String,
    pub viewers: Vec<StoryView>,
    pub total: usize,
}
