use crate::handlers::{self, health, reports, user_actions};
use actix_middleware::metrics_handler;
use actix_web::web;

/// Register every analytics-service route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .app_data(handlers::path_config())
        .route("/health", web::get().to(health::health))
        .route("/ready", web::get().to(health::ready))
        .route("/metrics", web::get().to(metrics_handler))
        .service(
            web::scope("/api/v1")
                .route(
                    "/user-action",
                    web::post().to(user_actions::record_user_action),
                )
                .route(
                    "/user-actions",
                    web::get().to(user_actions::list_user_actions),
                )
                .route(
                    "/user-actions/",
                    web::get().to(user_actions::get_user_actions_by_query),
                )
                .route(
                    "/user-actions/{user_id}",
                    web::get().to(user_actions::get_user_actions),
                )
                .route(
                    "/action-and-device-counts",
                    web::get().to(reports::action_and_device_counts),
                ),
        )
        .default_service(web::to(handlers::not_found));
}
