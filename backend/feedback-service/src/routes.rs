use crate::handlers::{self, health, messages, subscribers};
use actix_middleware::metrics_handler;
use actix_web::web;

/// Register every feedback-service route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .app_data(handlers::path_config())
        .route("/health", web::get().to(health::health))
        .route("/ready", web::get().to(health::ready))
        .route("/metrics", web::get().to(metrics_handler))
        .service(
            web::scope("/api/v1")
                .route("/user-message", web::post().to(messages::save_message))
                .route("/user-messages", web::get().to(messages::list_messages))
                .route("/user-messages/{id}", web::get().to(messages::get_message))
                .route("/email-subscribe", web::post().to(subscribers::subscribe))
                .route(
                    "/email-subscribers",
                    web::get().to(subscribers::list_subscribers),
                )
                .route(
                    "/email-subscribers/{id}",
                    web::get().to(subscribers::get_subscriber),
                ),
        )
        .default_service(web::to(handlers::not_found));
}
