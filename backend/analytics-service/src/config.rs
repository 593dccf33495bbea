/// Configuration management for analytics-service
///
/// `ANALYTICS_*` variables configure the HTTP surface, `CLICKHOUSE_*` the store.
use serde::Deserialize;
use std::fmt;

pub const SERVICE_NAME: &str = "analytics-service";

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppConfig,
    pub clickhouse: ClickHouseConfig,
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

#[derive(Clone, Deserialize)]
pub struct ClickHouseConfig {
    #[serde(default = "default_ch_host")]
    pub host: String,
    #[serde(default = "default_ch_port")]
    pub port: u16,
    #[serde(default = "default_ch_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_ch_database")]
    pub database: String,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Full HTTP endpoint; wins over host and port when set
    #[serde(default)]
    pub url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_ch_host() -> String {
    "localhost".to_string()
}

fn default_ch_port() -> u16 {
    8123
}

fn default_ch_username() -> String {
    "default".to_string()
}

fn default_ch_database() -> String {
    "default".to_string()
}

fn default_query_timeout_ms() -> u64 {
    5000
}

impl ClickHouseConfig {
    pub fn url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }

    /// `url()` with any `user:pass@` userinfo masked
    fn redacted_url(&self) -> String {
        let url = self.url();
        let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);
        let authority_end = url[authority_start..]
            .find('/')
            .map(|i| authority_start + i)
            .unwrap_or(url.len());
        match url[authority_start..authority_end].rfind('@') {
            Some(at) => format!(
                "{}[REDACTED]{}",
                &url[..authority_start],
                &url[authority_start + at..]
            ),
            None => url,
        }
    }
}

impl fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("url", &self.redacted_url())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("query_timeout_ms", &self.query_timeout_ms)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        Ok(Self {
            app: envy::prefixed("ANALYTICS_").from_env::<AppConfig>()?,
            clickhouse: envy::prefixed("CLICKHOUSE_").from_env::<ClickHouseConfig>()?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
