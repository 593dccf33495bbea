/// OpenAPI documentation for the Parkovich feedback service
use crate::error::ErrorResponse;
use crate::handlers::{health, messages, subscribers};
use crate::models::{
    CreateMessageRequest, EmailSubscriber, MessageResponse, SubscribeRequest, UserMessage,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parkovich Feedback Service API",
        version = "1.0.0",
        description = "Contact-form messages and newsletter subscriptions. Submitting a message also subscribes the sender's email.",
        license(name = "MIT")
    ),
    servers((url = "http://localhost:8080", description = "Development server")),
    paths(
        health::health,
        health::ready,
        messages::save_message,
        messages::list_messages,
        messages::get_message,
        subscribers::subscribe,
        subscribers::list_subscribers,
        subscribers::get_subscriber,
    ),
    components(schemas(
        UserMessage,
        EmailSubscriber,
        CreateMessageRequest,
        SubscribeRequest,
        MessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "user-messages", description = "Contact-form messages"),
        (name = "email-subscribers", description = "Newsletter subscribers"),
    )
)]
pub struct ApiDoc;
