pub mod health;
pub mod reports;
pub mod user_actions;

use crate::error::{AnalyticsError, Result};
use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest, HttpResponse};

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AnalyticsError::Validation(format!("invalid request body: {}", err)).into()
        })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        AnalyticsError::Validation(format!("invalid path: {}", err)).into()
    })
}

pub async fn not_found() -> Result<HttpResponse> {
    Err(AnalyticsError::NotFound("not found".into()))
}
