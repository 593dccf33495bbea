//! User-action storage on ClickHouse

mod ch_client;
mod user_actions;

pub use ch_client::ClickHouseClient;
pub use user_actions::{plan_upsert, ClickHouseUserActionStore, UPSERT_TABLE};

use crate::error::Result;
use crate::models::{NewUserAction, UserAction};
use async_trait::async_trait;
use std::collections::HashMap;

/// Counting store for user actions
///
/// Repeating an event type increments the `action_count` of its existing row;
/// a new event type gets a fresh synthetic `user_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserActionStore: Send + Sync {
    /// Record one action and return the logical row after the write.
    async fn upsert_user_action(&self, action: NewUserAction) -> Result<UserAction>;

    async fn list_all(&self) -> Result<Vec<UserAction>>;

    /// Actions owned by `user_id`; empty when the id is unknown
    async fn list_by_owner(&self, user_id: u64) -> Result<Vec<UserAction>>;

    /// Total `action_count` per event type
    async fn counts_by_event_type(&self) -> Result<HashMap<String, u64>>;

    async fn counts_by_device_type(&self) -> Result<HashMap<String, u64>>;

    async fn counts_by_user_agent(&self) -> Result<HashMap<String, u64>>;

    async fn ping(&self) -> Result<()>;
}
