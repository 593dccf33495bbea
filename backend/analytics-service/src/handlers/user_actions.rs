use crate::db::UserActionStore;
use crate::error::{AnalyticsError, Result};
use crate::models::{MessageResponse, UserAction, UserActionRequest};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Record one user action
#[utoipa::path(
    post,
    path = "/api/v1/user-action",
    tag = "user-actions",
    request_body = UserActionRequest,
    responses(
        (status = 200, description = "Action recorded", body = MessageResponse),
        (status = 400, description = "Missing or unsupported field", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn record_user_action(
    store: web::Data<dyn UserActionStore>,
    body: web::Json<UserActionRequest>,
) -> Result<HttpResponse> {
    let action = body.into_inner().into_new_action()?;

    store.upsert_user_action(action).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Action saved")))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-actions",
    tag = "user-actions",
    responses(
        (status = 200, description = "Every logical user action", body = [UserAction]),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_user_actions(store: web::Data<dyn UserActionStore>) -> Result<HttpResponse> {
    let actions = store.list_all().await?;
    Ok(HttpResponse::Ok().json(actions))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-actions/{user_id}",
    tag = "user-actions",
    params(("user_id" = u64, Path, description = "Synthetic owner id")),
    responses(
        (status = 200, description = "Actions of the owner", body = [UserAction]),
        (status = 400, description = "Missing or malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "No actions for this id", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_user_actions(
    store: web::Data<dyn UserActionStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    owner_actions(store.get_ref(), &path).await
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Option<String>,
}

/// `/api/v1/user-actions/` with the id in the query string, or missing
pub async fn get_user_actions_by_query(
    store: web::Data<dyn UserActionStore>,
    query: web::Query<OwnerQuery>,
) -> Result<HttpResponse> {
    owner_actions(store.get_ref(), query.user_id.as_deref().unwrap_or_default()).await
}

async fn owner_actions(store: &dyn UserActionStore, raw: &str) -> Result<HttpResponse> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AnalyticsError::Validation("user_id is required".into()));
    }
    let user_id = raw
        .parse::<u64>()
        .map_err(|_| AnalyticsError::Validation(format!("invalid user_id: {}", raw)))?;

    let actions = store.list_by_owner(user_id).await?;
    if actions.is_empty() {
        return Err(AnalyticsError::NotFound(format!(
            "no actions for user {}",
            user_id
        )));
    }

    Ok(HttpResponse::Ok().json(actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockUserActionStore;
    use crate::models::NewUserAction;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use input_validation::{DeviceType, EventType};
    use std::sync::Arc;

    fn data(mock: MockUserActionStore) -> web::Data<dyn UserActionStore> {
        let store: Arc<dyn UserActionStore> = Arc::new(mock);
        web::Data::from(store)
    }

    fn stored(user_id: u64, event_type: &str, action_count: u64) -> UserAction {
        UserAction {
            user_id,
            event_type: event_type.into(),
            user_agent: "Chrome".into(),
            device_type: "mobile".into(),
            event_time: Utc::now(),
            action_count,
        }
    }

    #[actix_rt::test]
    async fn test_record_passes_parsed_action() {
        let mut mock = MockUserActionStore::new();
        mock.expect_upsert_user_action()
            .withf(|a: &NewUserAction| {
                a.event_type == EventType::SessionScrolled2
                    && a.device_type == DeviceType::Mobile
                    && a.user_agent == "Safari"
            })
            .times(1)
            .returning(|a| Ok(stored(1, a.event_type.as_str(), 1)));

        let app = test::init_service(
            App::new()
                .app_data(data(mock))
                .app_data(crate::handlers::json_config())
                .route("/api/v1/user-action", web::post().to(record_user_action)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/user-action")
            .set_json(serde_json::json!({
                "event_type": "session_scrolled_2",
                "user_agent": "Safari",
                "device_type": "mobile"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Action saved");
    }

    #[actix_rt::test]
    async fn test_unknown_device_is_rejected_before_store() {
        let mut mock = MockUserActionStore::new();
        mock.expect_upsert_user_action().times(0);

        let app = test::init_service(
            App::new()
                .app_data(data(mock))
                .route("/api/v1/user-action", web::post().to(record_user_action)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/user-action")
            .set_json(serde_json::json!({
                "event_type": "visited",
                "user_agent": "Safari",
                "device_type": "tablet"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "device_type: device type must be 'desktop' or 'mobile'"
        );
    }

    #[actix_rt::test]
    async fn test_owner_lookup_statuses() {
        let mut mock = MockUserActionStore::new();
        mock.expect_list_by_owner().returning(|user_id| {
            if user_id == 2 {
                Ok(vec![stored(2, "comment", 3)])
            } else {
                Ok(Vec::new())
            }
        });

        let app = test::init_service(
            App::new().app_data(data(mock)).route(
                "/api/v1/user-actions/{user_id}",
                web::get().to(get_user_actions),
            ),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/user-actions/2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Vec<UserAction> = test::read_body_json(resp).await;
        assert_eq!(body[0].action_count, 3);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/user-actions/5").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/user-actions/abc").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_storage_failure_is_500() {
        let mut mock = MockUserActionStore::new();
        mock.expect_list_by_owner()
            .returning(|_| Err(AnalyticsError::Internal("connection reset".into())));

        let app = test::init_service(
            App::new().app_data(data(mock)).route(
                "/api/v1/user-actions/{user_id}",
                web::get().to(get_user_actions),
            ),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/user-actions/1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "internal server error");
    }
}
