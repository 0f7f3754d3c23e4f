//! Story lifecycle without a backing store: every call synthesizes the
//! record it would have produced, stamped with the supplied clock reading.

use chrono::{DateTime, Utc};

use crate::{
    dto::story_dto::{
        DeleteStoryPayload, DeletedStory, ReactStoryPayload, Story, StoryList, StoryReaction,
        StoryView, StoryViewers, UploadStoryPayload, ViewStoryPayload,
    },
    utils::time::{story_expiry, to_iso},
};

pub const DEFAULT_PRIVACY: &str = "public";
pub const DEFAULT_DURATION_SECS: u32 = 15;

pub fn story_id(user_id: &str, created_at: DateTime<Utc>) -> String {
    format!("story_{}_{}", created_at.timestamp_millis(), user_id)
}

#[derive(Debug, Clone, Default)]
pub struct StoryService;

impl StoryService {
    pub fn new() -> Self {
        Self
    }

    /// Payloads are expected to be validated already; absent optional
    /// fields fall back to their defaults.
    pub fn upload(&self, payload: UploadStoryPayload, now: DateTime<Utc>) -> Story {
        let user_id = payload.user_id.unwrap_or_default();
        Story {
            story_id: story_id(&user_id, now),
            user_id,
            media: payload.media,
            caption: payload.caption.unwrap_or_default(),
            privacy: payload
                .privacy
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PRIVACY.to_string()),
            duration: payload.duration.unwrap_or(DEFAULT_DURATION_SECS),
            created_at: to_iso(now),
            expires_at: to_iso(story_expiry(now)),
            views: None,
            reactions: None,
        }
    }

    pub fn record_view(&self, payload: ViewStoryPayload, now: DateTime<Utc>) -> StoryView {
        StoryView {
            story_id: payload.story_id.unwrap_or_default(),
            viewer_id: payload.viewer_id.unwrap_or_default(),
            viewed_at: to_iso(now),
        }
    }

    pub fn react(&self, payload: ReactStoryPayload, now: DateTime<Utc>) -> StoryReaction {
        StoryReaction {
            story_id: payload.story_id.unwrap_or_default(),
            user_id: payload.user_id.unwrap_or_default(),
            reaction: payload.reaction.unwrap_or_default(),
            reacted_at: to_iso(now),
        }
    }

    pub fn delete(
        &self,
        story_id: String,
        payload: DeleteStoryPayload,
        now: DateTime<Utc>,
    ) -> DeletedStory {
        DeletedStory {
            story_id,
            user_id: payload.user_id.unwrap_or_default(),
            deleted_at: to_iso(now),
        }
    }

    pub fn list(&self, user_id: Option<String>) -> StoryList {
        StoryList {
            user_id,
            stories: Vec::new(),
            total: 0,
        }
    }

    /// Fixed example record returned for any id.
    pub fn metadata(&self, story_id: String, now: DateTime<Utc>) -> Story {
        Story {
            story_id,
            user_id: "example_user".to_string(),
            media: None,
            caption: "Example story".to_string(),
            privacy: DEFAULT_PRIVACY.to_string(),
            duration: DEFAULT_DURATION_SECS,
            created_at: to_iso(now),
            expires_at: to_iso(story_expiry(now)),
            views: Some(0),
            reactions: Some(0),
        }
    }

    pub fn viewers(&self, story_id: String) -> StoryViewers {
        StoryViewers {
            story_id,
            viewers: Vec::new(),
            total: 0,
        }
    }
}
