use crate::db::FeedbackRepository;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Liveness probe
#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Process is up")))]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness probe: the database must answer
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable"),
    )
)]
pub async fn ready(repo: web::Data<dyn FeedbackRepository>) -> HttpResponse {
    match repo.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "error": "database unavailable" }))
        }
    }
}
