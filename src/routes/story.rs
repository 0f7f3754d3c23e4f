use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    dto::story_dto::{
        ApiResponse, DeleteStoryPayload, ListStoriesQuery, ReactStoryPayload, UploadStoryPayload,
        ViewStoryPayload,
    },
    error::Result,
    extract::ValidatedJson,
    utils::time::now,
    AppState,
};

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Story API server is running!",
        "status": "success",
        "endpoints": {
            "upload": "POST /api/story/upload",
            "view": "POST /api/story/view",
            "list": "GET /api/story/list",
            "delete": "DELETE /api/story/:id",
            "react": "POST /api/story/react",
            "metadata": "GET /api/story/:id",
            "viewers": "GET /api/story/:id/viewers",
            "health": "GET /health",
        },
    }))
}

#[axum::debug_handler]
pub async fn upload_story(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UploadStoryPayload>,
) -> Result<impl IntoResponse> {
    let story = state.story_service.upload(payload, now());
    info!(story_id = %story.story_id, user_id = %story.user_id, "Story uploaded");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(story).with_message("Story uploaded successfully")),
    ))
}

#[axum::debug_handler]
pub async fn view_story(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ViewStoryPayload>,
) -> Result<impl IntoResponse> {
    let view = state.story_service.record_view(payload, now());
    info!(story_id = %view.story_id, viewer_id = %view.viewer_id, "Story viewed");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(view).with_message("Story view recorded")),
    ))
}

pub async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<ListStoriesQuery>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(state.story_service.list(query.user_id)))
}

#[axum::debug_handler]
pub async fn delete_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<DeleteStoryPayload>,
) -> Result<impl IntoResponse> {
    let deleted = state.story_service.delete(story_id, payload, now());
    info!(story_id = %deleted.story_id, user_id = %deleted.user_id, "Story deleted");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(deleted).with_message("Story deleted successfully")),
    ))
}

#[axum::debug_handler]
pub async fn react_to_story(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ReactStoryPayload>,
) -> Result<impl IntoResponse> {
    let reaction = state.story_service.react(payload, now());
    info!(story_id = %reaction.story_id, reaction = %reaction.reaction, "Story reaction");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(reaction).with_message("Reaction added successfully")),
    ))
}

pub async fn get_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(state.story_service.metadata(story_id, now())))
}

pub async fn get_story_viewers(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(state.story_service.viewers(story_id)))
}
