use super::{ClickHouseClient, UserActionStore};
use crate::error::Result;
use crate::models::{NewUserAction, UserAction, UserActionRow};
use async_trait::async_trait;
use clickhouse::Row;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub const UPSERT_TABLE: &str = "user_actions";

const LOGICAL_ROW_COLUMNS: &str = r#"
    user_id,
    event_type,
    any(user_agent) AS user_agent,
    any(device_type) AS device_type,
    min(event_time) AS event_time,
    sum(action_count) AS action_count
"#;

#[derive(Debug, Deserialize, Row)]
struct KeyCount {
    key: String,
    count: u64,
}

#[derive(Debug, Deserialize, Row)]
struct MaxUserId {
    max_user_id: u64,
}

/// Decide which row an upsert writes.
///
/// With an `owner` row the result is a delta row (`action_count = 1`) that
/// copies the owner's identity, which `SummingMergeTree` folds into the owner.
/// Without one, a first row is created under `max_user_id + 1`.
pub fn plan_upsert(
    owner: Option<&UserActionRow>,
    max_user_id: u64,
    action: &NewUserAction,
) -> UserActionRow {
    match owner {
        Some(owner) => UserActionRow {
            action_count: 1,
            ..owner.clone()
        },
        None => UserActionRow {
            user_id: max_user_id.saturating_add(1),
            event_type: action.event_type.as_str().to_string(),
            user_agent: action.user_agent.clone(),
            device_type: action.device_type.as_str().to_string(),
            event_time: action.event_time_secs(),
            action_count: 1,
        },
    }
}

/// [`UserActionStore`] over a `SummingMergeTree` table
pub struct ClickHouseUserActionStore {
    ch: ClickHouseClient,
    // Owner lookup and insert must not interleave within this process
    upsert_lock: Mutex<()>,
}

impl ClickHouseUserActionStore {
    pub fn new(ch: ClickHouseClient) -> Self {
        Self {
            ch,
            upsert_lock: Mutex::new(()),
        }
    }

    async fn find_owner(&self, event_type: &str) -> Result<Option<UserActionRow>> {
        let sql = format!(
            "SELECT {LOGICAL_ROW_COLUMNS} FROM {UPSERT_TABLE} \
             WHERE event_type = ? \
             GROUP BY user_id, event_type \
             ORDER BY user_id \
             LIMIT 1"
        );
        let rows = self
            .ch
            .query_with_params::<UserActionRow, _>(&sql, |q| q.bind(event_type))
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn max_user_id(&self) -> Result<u64> {
        let sql = format!("SELECT max(user_id) AS max_user_id FROM {UPSERT_TABLE}");
        let rows = self.ch.query::<MaxUserId>(&sql).await?;
        Ok(rows.into_iter().next().map(|r| r.max_user_id).unwrap_or(0))
    }

    async fn counts_by(&self, column: &str) -> Result<HashMap<String, u64>> {
        let sql = format!(
            "SELECT {column} AS key, sum(action_count) AS count \
             FROM {UPSERT_TABLE} GROUP BY {column}"
        );
        let rows = self.ch.query::<KeyCount>(&sql).await?;
        Ok(rows.into_iter().map(|r| (r.key, r.count)).collect())
    }
}

#[async_trait]
impl UserActionStore for ClickHouseUserActionStore {
    async fn upsert_user_action(&self, action: NewUserAction) -> Result<UserAction> {
        let _guard = self.upsert_lock.lock().await;

        let owner = self.find_owner(action.event_type.as_str()).await?;
        let max_user_id = match owner {
            Some(_) => 0,
            None => self.max_user_id().await?,
        };

        let row = plan_upsert(owner.as_ref(), max_user_id, &action);
        self.ch
            .insert_rows(UPSERT_TABLE, std::slice::from_ref(&row))
            .await?;

        let logical = match owner {
            Some(owner) => UserActionRow {
                action_count: owner.action_count + 1,
                ..owner
            },
            None => row,
        };

        tracing::info!(
            user_id = logical.user_id,
            event_type = %logical.event_type,
            action_count = logical.action_count,
            "User action recorded"
        );

        Ok(logical.into())
    }

    async fn list_all(&self) -> Result<Vec<UserAction>> {
        let sql = format!(
            "SELECT {LOGICAL_ROW_COLUMNS} FROM {UPSERT_TABLE} \
             GROUP BY user_id, event_type \
             ORDER BY user_id, event_type"
        );
        let rows = self.ch.query::<UserActionRow>(&sql).await?;
        Ok(rows.into_iter().map(UserAction::from).collect())
    }

    async fn list_by_owner(&self, user_id: u64) -> Result<Vec<UserAction>> {
        let sql = format!(
            "SELECT {LOGICAL_ROW_COLUMNS} FROM {UPSERT_TABLE} \
             WHERE user_id = ? \
             GROUP BY user_id, event_type \
             ORDER BY event_type"
        );
        let rows = self
            .ch
            .query_with_params::<UserActionRow, _>(&sql, |q| q.bind(user_id))
            .await?;
        Ok(rows.into_iter().map(UserAction::from).collect())
    }

    async fn counts_by_event_type(&self) -> Result<HashMap<String, u64>> {
        self.counts_by("event_type").await
    }

    async fn counts_by_device_type(&self) -> Result<HashMap<String, u64>> {
        self.counts_by("device_type").await
    }

    async fn counts_by_user_agent(&self) -> Result<HashMap<String, u64>> {
        self.counts_by("user_agent").await
    }

    async fn ping(&self) -> Result<()> {
        self.ch.health_check().await
    }
}
