use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::error::{Error, Result};

/// JSON body extractor that tolerates a missing content type or an empty
/// body (both read as `{}`) and runs `Validate` before the handler sees it.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;

        let value = lenient_json(&bytes);
        let payload: T = serde_json::from_value(value)?;
        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}

/// Parses a request body, falling back to an empty object.
pub fn lenient_json(bytes: &[u8]) -> JsonValue {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return JsonValue::Object(Default::default());
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "request body is not JSON, treating as empty");
            JsonValue::Object(Default::default())
        }
    }
}
