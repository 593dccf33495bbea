/// OpenAPI documentation for the Parkovich analytics service
use crate::error::ErrorResponse;
use crate::handlers::{health, reports, user_actions};
use crate::models::{MessageResponse, UserAction, UserActionRequest};
use crate::services::ActionReport;
use input_validation::{DeviceType, EventType};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parkovich Analytics Service API",
        version = "1.0.0",
        description = "Landing-page user actions stored in ClickHouse. Repeated event types increment a counter instead of adding rows; the report endpoint folds the counters into funnel buckets.",
        license(name = "MIT")
    ),
    servers((url = "http://localhost:8081", description = "Development server")),
    paths(
        health::health,
        health::ready,
        user_actions::record_user_action,
        user_actions::list_user_actions,
        user_actions::get_user_actions,
        reports::action_and_device_counts,
    ),
    components(schemas(
        UserAction,
        UserActionRequest,
        ActionReport,
        EventType,
        DeviceType,
        MessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "user-actions", description = "User action counters"),
        (name = "reports", description = "Aggregated funnel report"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/user-action",
            "/api/v1/user-actions",
            "/api/v1/user-actions/{user_id}",
            "/api/v1/action-and-device-counts",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
