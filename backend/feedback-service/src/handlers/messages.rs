use super::parse_id;
use crate::db::FeedbackRepository;
use crate::error::{FeedbackError, Result};
use crate::models::{CreateMessageRequest, MessageResponse, UserMessage};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Store a contact-form message and subscribe its sender
#[utoipa::path(
    post,
    path = "/api/v1/user-message",
    tag = "user-messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 200, description = "Message saved", body = MessageResponse),
        (status = 400, description = "Invalid name, email or message", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn save_message(
    repo: web::Data<dyn FeedbackRepository>,
    body: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    let saved = repo
        .save_message(&body.name, &body.email, &body.message)
        .await?;

    tracing::debug!(
        message_id = saved.message.id,
        new_subscriber = saved.new_subscriber,
        "Message accepted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("Message saved successfully")))
}

/// List messages, newest first
#[utoipa::path(
    get,
    path = "/api/v1/user-messages",
    tag = "user-messages",
    responses(
        (status = 200, description = "All messages", body = [UserMessage]),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_messages(repo: web::Data<dyn FeedbackRepository>) -> Result<HttpResponse> {
    let messages = repo.list_messages().await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-messages/{id}",
    tag = "user-messages",
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "The message", body = UserMessage),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "No such message", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_message(
    repo: web::Data<dyn FeedbackRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;

    let message = repo
        .get_message(id)
        .await?
        .ok_or_else(|| FeedbackError::NotFound(format!("message {} not found", id)))?;

    Ok(HttpResponse::Ok().json(message))
}
