/// Configuration management for feedback-service
///
/// `FEEDBACK_*` variables configure the HTTP surface; Postgres settings come
/// from `db_pool::DbConfig` (`DATABASE_URL`, `DB_*`).
use db_pool::DbConfig;
use serde::Deserialize;

pub const SERVICE_NAME: &str = "feedback-service";

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppConfig,
    pub database: DbConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        Ok(Self {
            app: envy::prefixed("FEEDBACK_").from_env::<AppConfig>()?,
            database: DbConfig::for_service(SERVICE_NAME),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in [
            "FEEDBACK_HOST",
            "FEEDBACK_PORT",
            "FEEDBACK_REQUEST_TIMEOUT_SECS",
            "FEEDBACK_CORS_ALLOWED_ORIGINS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.request_timeout_secs, 30);
        assert_eq!(config.app.cors_allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.service_name, SERVICE_NAME);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear();
        std::env::set_var("FEEDBACK_PORT", "9090");
        std::env::set_var(
            "FEEDBACK_CORS_ALLOWED_ORIGINS",
            "https://parkovich.example,https://admin.parkovich.example",
        );

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9090);
        assert_eq!(config.app.cors_allowed_origins.len(), 2);

        std::env::set_var("FEEDBACK_PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        clear();
    }
}
