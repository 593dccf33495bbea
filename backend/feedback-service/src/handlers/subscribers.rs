use super::parse_id;
use crate::db::FeedbackRepository;
use crate::error::{FeedbackError, Result};
use crate::models::{EmailSubscriber, MessageResponse, SubscribeRequest};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Subscribe an email to the newsletter
#[utoipa::path(
    post,
    path = "/api/v1/email-subscribe",
    tag = "email-subscribers",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed", body = MessageResponse),
        (status = 400, description = "Invalid email", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already subscribed", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn subscribe(
    repo: web::Data<dyn FeedbackRepository>,
    body: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    repo.save_subscriber(&body.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Subscribed successfully")))
}

/// List subscribers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/email-subscribers",
    tag = "email-subscribers",
    responses(
        (status = 200, description = "All subscribers", body = [EmailSubscriber]),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_subscribers(repo: web::Data<dyn FeedbackRepository>) -> Result<HttpResponse> {
    let subscribers = repo.list_subscribers().await?;
    Ok(HttpResponse::Ok().json(subscribers))
}

#[utoipa::path(
    get,
    path = "/api/v1/email-subscribers/{id}",
    tag = "email-subscribers",
    params(("id" = i32, Path, description = "Subscriber id")),
    responses(
        (status = 200, description = "The subscriber", body = EmailSubscriber),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "No such subscriber", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_subscriber(
    repo: web::Data<dyn FeedbackRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;

    let subscriber = repo
        .get_subscriber(id)
        .await?
        .ok_or_else(|| FeedbackError::NotFound(format!("subscriber {} not found", id)))?;

    Ok(HttpResponse::Ok().json(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockFeedbackRepository;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use std::sync::Arc;

    fn data(mock: MockFeedbackRepository) -> web::Data<dyn FeedbackRepository> {
        let repo: Arc<dyn FeedbackRepository> = Arc::new(mock);
        web::Data::from(repo)
    }

    #[actix_rt::test]
    async fn test_duplicate_subscriber_is_conflict() {
        let mut mock = MockFeedbackRepository::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_save_subscriber()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|email| {
                Ok(EmailSubscriber {
                    id: 1,
                    email: email.to_string(),
                    subscribed_at: Utc::now(),
                })
            });
        mock.expect_save_subscriber()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(FeedbackError::Conflict("subscriber already exists".into())));

        let app = test::init_service(
            App::new()
                .app_data(data(mock))
                .route("/api/v1/email-subscribe", web::post().to(subscribe)),
        )
        .await;

        let payload = serde_json::json!({ "email": "a@b.com" });

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/email-subscribe")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Subscribed successfully");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/email-subscribe")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "subscriber already exists");
    }

    #[actix_rt::test]
    async fn test_invalid_email_is_bad_request() {
        let mut mock = MockFeedbackRepository::new();
        mock.expect_save_subscriber().times(0);

        let app = test::init_service(
            App::new()
                .app_data(data(mock))
                .route("/api/v1/email-subscribe", web::post().to(subscribe)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/email-subscribe")
                .set_json(serde_json::json!({ "email": "a@b" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "email: invalid email");
    }

    #[actix_rt::test]
    async fn test_get_subscriber_not_found() {
        let mut mock = MockFeedbackRepository::new();
        mock.expect_get_subscriber().returning(|_| Ok(None));

        let app = test::init_service(
            App::new()
                .app_data(data(mock))
                .route("/api/v1/email-subscribers/{id}", web::get().to(get_subscriber)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/email-subscribers/3")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "subscriber 3 not found");
    }
}
