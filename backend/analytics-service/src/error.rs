use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("ClickHouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),

    #[error("ClickHouse query timed out after {0:?}")]
    QueryTimeout(Duration),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of every non-2xx response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for AnalyticsError {
    fn error_response(&self) -> HttpResponse {
        let code = self.status_code();
        let message = match self {
            AnalyticsError::NotFound(msg) | AnalyticsError::Validation(msg) => msg.clone(),
            other => {
                tracing::error!(error = %other, "Request failed");
                "internal server error".to_string()
            }
        };

        HttpResponse::build(code).json(ErrorResponse { error: message })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AnalyticsError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalyticsError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AnalyticsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AnalyticsError::Validation(input_validation::describe(&errors))
    }
}
