//! Rows and request/response bodies for the feedback API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A submitted contact-form message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A newsletter subscriber, unique by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmailSubscriber {
    pub id: i32,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

/// Result of storing a message together with its subscription side effect
#[derive(Debug, Clone)]
pub struct SavedMessage {
    pub message: UserMessage,
    /// False when the sender was already subscribed
    pub new_subscriber: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMessageRequest {
    #[validate(custom(function = "input_validation::rules::name"))]
    #[schema(example = "Anna")]
    pub name: String,
    #[validate(custom(function = "input_validation::rules::email"))]
    #[schema(example = "anna@example.com")]
    pub email: String,
    #[validate(custom(function = "input_validation::rules::message"))]
    #[schema(example = "When does the parking open?")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    #[validate(custom(function = "input_validation::rules::email"))]
    #[schema(example = "anna@example.com")]
    pub email: String,
}

/// Textual success body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
