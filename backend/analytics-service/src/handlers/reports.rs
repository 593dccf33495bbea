use crate::db::UserActionStore;
use crate::error::Result;
use crate::services::ActionReport;
use actix_web::{web, HttpResponse};

/// Funnel counts with device and browser breakdowns
#[utoipa::path(
    get,
    path = "/api/v1/action-and-device-counts",
    tag = "reports",
    responses(
        (status = 200, description = "Aggregated report", body = ActionReport),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse),
    )
)]
pub async fn action_and_device_counts(
    store: web::Data<dyn UserActionStore>,
) -> Result<HttpResponse> {
    let (counts, devices, browsers) = tokio::try_join!(
        store.counts_by_event_type(),
        store.counts_by_device_type(),
        store.counts_by_user_agent(),
    )?;

    let report = ActionReport::from_counts(&counts, devices, browsers);
    Ok(HttpResponse::Ok().json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockUserActionStore;
    use actix_web::{http::StatusCode, test, App};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_report_combines_three_aggregates() {
        let mut mock = MockUserActionStore::new();
        mock.expect_counts_by_event_type().returning(|| {
            Ok(HashMap::from([
                ("visited".to_string(), 5),
                ("session_scrolled_3".to_string(), 2),
            ]))
        });
        mock.expect_counts_by_device_type()
            .returning(|| Ok(HashMap::from([("desktop".to_string(), 7)])));
        mock.expect_counts_by_user_agent()
            .returning(|| Ok(HashMap::from([("Chrome".to_string(), 7)])));

        let store: Arc<dyn UserActionStore> = Arc::new(mock);
        let app = test::init_service(App::new().app_data(web::Data::from(store)).route(
            "/api/v1/action-and-device-counts",
            web::get().to(action_and_device_counts),
        ))
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/action-and-device-counts")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let report: ActionReport = test::read_body_json(resp).await;
        assert_eq!(report.visitors, 5);
        assert_eq!(report.sections, vec![0, 0, 2, 0, 0, 0, 0, 0]);
        assert_eq!(report.devices["desktop"], 7);
        assert_eq!(report.browsers["Chrome"], 7);
    }
}
