use clickhouse::{insert::Insert, query::Query, Client, Row};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ClickHouseConfig;
use crate::error::{AnalyticsError, Result};

/// ClickHouse HTTP client with a per-query deadline
#[derive(Clone)]
pub struct ClickHouseClient {
    client: Client,
    query_timeout: Duration,
}

impl ClickHouseClient {
    pub fn new(config: &ClickHouseConfig) -> Self {
        let client = Client::default()
            .with_url(config.url())
            .with_database(&config.database)
            .with_user(&config.username)
            .with_password(&config.password)
            .with_option(
                "max_execution_time",
                (config.query_timeout_ms / 1000).max(1).to_string(),
            );

        Self {
            client,
            query_timeout: Duration::from_millis(config.query_timeout_ms),
        }
    }

    async fn bounded<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, clickhouse::error::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("ClickHouse {} failed: {}", what, e);
                Err(AnalyticsError::ClickHouse(e))
            }
            Err(_) => {
                error!("ClickHouse {} timed out after {:?}", what, self.query_timeout);
                Err(AnalyticsError::QueryTimeout(self.query_timeout))
            }
        }
    }

    pub async fn query_with_params<T, F>(&self, template: &str, binder: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Row,
        F: FnOnce(Query) -> Query,
    {
        debug!(
            "Executing ClickHouse query (first 200 chars): {}",
            &template[..template.len().min(200)]
        );

        let query = binder(self.client.query(template));
        self.bounded("query", query.fetch_all::<T>()).await
    }

    pub async fn query<T>(&self, template: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Row,
    {
        self.query_with_params(template, |q| q).await
    }

    /// Write `rows` in a single INSERT
    pub async fn insert_rows<T>(&self, table: &str, rows: &[T]) -> Result<()>
    where
        T: Serialize + Row,
    {
        if rows.is_empty() {
            return Ok(());
        }

        let write = async {
            let mut insert: Insert<T> = self.client.insert(table)?;
            for row in rows {
                insert.write(row).await?;
            }
            insert.end().await
        };
        self.bounded("insert", write).await
    }

    pub async fn execute(&self, statement: &str) -> Result<()> {
        debug!(
            "Executing ClickHouse statement (first 200 chars): {}",
            &statement[..statement.len().min(200)]
        );

        self.bounded("execute", self.client.query(statement).execute())
            .await
    }

    pub async fn health_check(&self) -> Result<()> {
        #[derive(Row, serde::Deserialize)]
        struct HealthCheck {
            _result: u32,
        }

        self.bounded(
            "health check",
            self.client
                .query("SELECT toUInt32(1) AS result")
                .fetch_one::<HealthCheck>(),
        )
        .await
        .map(|_| ())
    }
}
