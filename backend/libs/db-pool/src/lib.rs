//! PostgreSQL pool for the feedback service
//!
//! `DbConfig` is read from `DATABASE_URL` and `DB_*` variables; `create_pool`
//! connects, verifies the connection with a deadline and starts the gauge updater.

pub mod env_utils;
mod metrics;

use env_utils::parse_env_with_default;
use metrics::update_pool_metrics;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/parkovich";
const METRICS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct DbConfig {
    /// Label on pool gauges and log lines
    pub service_name: String,
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Deadline for the startup verification query
    pub connect_timeout_secs: u64,
    /// Wait for a free connection before a query fails
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl fmt::Debug for DbConfig {
    // Credentials live in the URL
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("connections", &(self.min_connections..=self.max_connections))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".to_string(),
            database_url: String::new(),
            max_connections: 20,
            min_connections: 5,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl DbConfig {
    /// Pool sized for `service_name`, falling back to a local database URL.
    ///
    /// Form intake needs only a handful of connections; unknown services get
    /// the smallest allocation.
    pub fn for_service(service_name: &str) -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let (max_connections, min_connections) = match service_name {
            "feedback-service" => (10, 2),
            _ => (2, 1),
        };

        Self {
            service_name: service_name.to_string(),
            database_url,
            max_connections,
            min_connections,
            ..Self::default()
        }
        .with_env_overrides()
    }

    /// Apply `DB_*` overrides; unparsable values keep the current setting.
    fn with_env_overrides(self) -> Self {
        Self {
            max_connections: parse_env_with_default("DB_MAX_CONNECTIONS", self.max_connections),
            min_connections: parse_env_with_default("DB_MIN_CONNECTIONS", self.min_connections),
            connect_timeout_secs: parse_env_with_default(
                "DB_CONNECT_TIMEOUT_SECS",
                self.connect_timeout_secs,
            ),
            acquire_timeout_secs: parse_env_with_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                self.acquire_timeout_secs,
            ),
            idle_timeout_secs: parse_env_with_default("DB_IDLE_TIMEOUT_SECS", self.idle_timeout_secs),
            max_lifetime_secs: parse_env_with_default("DB_MAX_LIFETIME_SECS", self.max_lifetime_secs),
            ..self
        }
    }

    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            connect_timeout_secs = self.connect_timeout_secs,
            acquire_timeout_secs = self.acquire_timeout_secs,
            idle_timeout_secs = self.idle_timeout_secs,
            max_lifetime_secs = self.max_lifetime_secs,
            "Database pool configuration"
        );
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .test_before_acquire(true)
    }
}

/// Connect, verify with `SELECT 1` and start publishing pool gauges.
pub async fn create_pool(config: DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = config.pool_options().connect(&config.database_url).await?;

    let deadline = Duration::from_secs(config.connect_timeout_secs);
    match tokio::time::timeout(deadline, ping(&pool)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(service = %config.service_name, error = %e, "Database verification failed");
            return Err(e);
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "Database verification timed out"
            );
            return Err(sqlx::Error::PoolTimedOut);
        }
    }

    info!(service = %config.service_name, "Database pool ready");

    update_pool_metrics(&pool, &config.service_name);
    let gauge_pool = pool.clone();
    let service = config.service_name;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_INTERVAL);
        loop {
            interval.tick().await;
            update_pool_metrics(&gauge_pool, &service);
        }
    });

    Ok(pool)
}

/// Round-trip a trivial query; used at startup and by readiness probes.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const OVERRIDES: [&str; 6] = [
        "DB_MAX_CONNECTIONS",
        "DB_MIN_CONNECTIONS",
        "DB_CONNECT_TIMEOUT_SECS",
        "DB_ACQUIRE_TIMEOUT_SECS",
        "DB_IDLE_TIMEOUT_SECS",
        "DB_MAX_LIFETIME_SECS",
    ];

    fn clear_overrides() {
        for key in OVERRIDES {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_for_service_allocation() {
        clear_overrides();
        std::env::remove_var("DATABASE_URL");

        let feedback = DbConfig::for_service("feedback-service");
        assert_eq!((feedback.max_connections, feedback.min_connections), (10, 2));
        assert_eq!(feedback.database_url, DEFAULT_DATABASE_URL);

        let unknown = DbConfig::for_service("something-else");
        assert_eq!((unknown.max_connections, unknown.min_connections), (2, 1));
    }

    #[test]
    #[serial]
    fn test_env_overrides_ignore_garbage() {
        clear_overrides();
        std::env::set_var("DB_MAX_CONNECTIONS", "64");
        std::env::set_var("DB_ACQUIRE_TIMEOUT_SECS", "not-a-number");

        let config = DbConfig::for_service("feedback-service");
        assert_eq!(config.max_connections, 64);
        assert_eq!(config.acquire_timeout_secs, 10);

        clear_overrides();
    }

    #[test]
    fn test_debug_redacts_url() {
        let config = DbConfig {
            database_url: "postgres://user:hunter2@db/app".to_string(),
            ..DbConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
