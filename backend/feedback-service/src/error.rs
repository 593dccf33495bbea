use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type Result<T> = std::result::Result<T, FeedbackError>;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of every non-2xx response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for FeedbackError {
    fn status_code(&self) -> StatusCode {
        match self {
            FeedbackError::Validation(_) => StatusCode::BAD_REQUEST,
            FeedbackError::NotFound(_) => StatusCode::NOT_FOUND,
            FeedbackError::Conflict(_) => StatusCode::CONFLICT,
            FeedbackError::Database(_) | FeedbackError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            FeedbackError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "internal server error".to_string()
            }
            FeedbackError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

impl From<validator::ValidationErrors> for FeedbackError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FeedbackError::Validation(input_validation::describe(&errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_database_errors_are_opaque() {
        let err = FeedbackError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "internal server error");
    }

    #[actix_rt::test]
    async fn test_conflict_keeps_message() {
        let err = FeedbackError::Conflict("subscriber already exists".into());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "subscriber already exists");
    }
}
