use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Route not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Status code and client-facing message for this error.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Validation(errs) => (StatusCode::BAD_REQUEST, validation_message(errs)),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Route not found".to_string()),
            Error::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Error::Reqwest(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let mut body = json!({ "success": false, "error": error_message });
        if let Error::NotFound(path) = &self {
            body["requestedPath"] = json!(path);
        }
        (status, Json(body)).into_response()
    }
}

/// Flattens field errors into `"<msg>, <msg>"`, ordered by field name.
fn validation_message(errs: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errs.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .filter_map(|(field, list)| {
            list.first().map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();

    if messages.is_empty() {
        errs.to_string()
    } else {
        messages.join(", ")
    }
}
