use actix_middleware::{build_cors, CorrelationIdMiddleware, MetricsMiddleware, RequestTimeout};
use actix_web::{web, App, HttpServer};
use analytics_service::db::{ClickHouseClient, ClickHouseUserActionStore, UserActionStore};
use analytics_service::openapi::ApiDoc;
use analytics_service::config::SERVICE_NAME;
use analytics_service::{routes, Config};
use anyhow::{Context, Result};
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
                .unwrap_or_else(|_| "info,actix_web=info,analytics_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting analytics-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(clickhouse = ?config.clickhouse, "ClickHouse configuration");

    let ch = ClickHouseClient::new(&config.clickhouse);
    if let Err(e) = ch.health_check().await {
        // Readiness reports the outage; the process still serves /health
        tracing::warn!(error = %e, "ClickHouse not reachable at startup");
    }

    let store: Arc<dyn UserActionStore> = Arc::new(ClickHouseUserActionStore::new(ch));
    let store = web::Data::from(store);

    let bind_address = config.bind_address();
    let origins = config.app.cors_allowed_origins.clone();
    let timeout = RequestTimeout::from_secs(config.app.request_timeout_secs);

    tracing::info!(%bind_address, "analytics-service listening");

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
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

    tracing::info!("analytics-service shutting down");
    Ok(())
}
