use actix_middleware::{build_cors, CorrelationIdMiddleware, MetricsMiddleware, RequestTimeout};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use db_pool::create_pool;
use feedback_service::db::{FeedbackRepository, PgFeedbackRepository};
use feedback_service::openapi::ApiDoc;
use feedback_service::config::SERVICE_NAME;
use feedback_service::{routes, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,feedback_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting feedback-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.database.log_config();

    let pool = create_pool(config.database.clone())
        .await
        .context("Failed to create database pool")?;

    let repo: Arc<dyn FeedbackRepository> = Arc::new(PgFeedbackRepository::new(pool));
    let repo = web::Data::from(repo);

    let bind_address = config.bind_address();
    let origins = config.app.cors_allowed_origins.clone();
    let timeout = RequestTimeout::from_secs(config.app.request_timeout_secs);

    tracing::info!(%bind_address, "feedback-service listening");

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api/v1/openapi.json", ApiDoc::openapi()),
            )
            .configure(routes::configure)
            .wrap(timeout)
            .wrap(MetricsMiddleware::new(SERVICE_NAME))
            .wrap(build_cors(&origins))
            .wrap(CorrelationIdMiddleware)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server failed")?;

    tracing::info!("feedback-service shutting down");
    Ok(())
}
