pub mod health;
pub mod messages;
pub mod subscribers;

use crate::error::{FeedbackError, Result};
use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest, HttpResponse};

/// Parse a `{id}` path segment; only positive integers name a row.
pub(crate) fn parse_id(raw: &str) -> Result<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(FeedbackError::Validation(format!("invalid id: {}", raw))),
    }
}

/// JSON extractor settings that report malformed bodies as `{"error": ...}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            FeedbackError::Validation(format!("invalid request body: {}", err)).into()
        })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        FeedbackError::Validation(format!("invalid path: {}", err)).into()
    })
}

/// Fallback for unmatched routes
pub async fn not_found() -> Result<HttpResponse> {
    Err(FeedbackError::NotFound("not found".into()))
}
