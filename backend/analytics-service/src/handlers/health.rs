use crate::db::UserActionStore;
use actix_web::{web, HttpResponse};
use serde_json::json;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Process is up")))]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness probe: ClickHouse must answer
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "ClickHouse reachable"),
        (status = 503, description = "ClickHouse unreachable"),
    )
)]
pub async fn ready(store: web::Data<dyn UserActionStore>) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "error": "clickhouse unavailable" }))
        }
    }
}
