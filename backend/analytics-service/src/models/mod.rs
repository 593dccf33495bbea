//! User-action rows and request/response bodies for the analytics API

use crate::error::{AnalyticsError, Result};
use chrono::{DateTime, Utc};
use clickhouse::Row;
use input_validation::{DeviceType, EventType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Logical user action: one per `(user_id, event_type)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserAction {
    pub user_id: u64,
    #[schema(example = "visited")]
    pub event_type: String,
    pub user_agent: String,
    #[schema(example = "desktop")]
    pub device_type: String,
    pub event_time: DateTime<Utc>,
    pub action_count: u64,
}

/// `user_actions` row as ClickHouse stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct UserActionRow {
    pub user_id: u64,
    pub event_type: String,
    pub user_agent: String,
    pub device_type: String,
    /// Unix seconds, ClickHouse `DateTime`
    pub event_time: u32,
    pub action_count: u64,
}

impl From<UserActionRow> for UserAction {
    fn from(row: UserActionRow) -> Self {
        Self {
            user_id: row.user_id,
            event_type: row.event_type,
            user_agent: row.user_agent,
            device_type: row.device_type,
            event_time: DateTime::from_timestamp(i64::from(row.event_time), 0).unwrap_or_default(),
            action_count: row.action_count,
        }
    }
}

/// Validated input for the upsert
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserAction {
    pub event_type: EventType,
    pub user_agent: String,
    pub device_type: DeviceType,
    pub event_time: DateTime<Utc>,
}

impl NewUserAction {
    /// `event_time` clamped into the range of ClickHouse `DateTime`
    pub fn event_time_secs(&self) -> u32 {
        self.event_time.timestamp().clamp(0, i64::from(u32::MAX)) as u32
    }
}

/// Body of `POST /api/v1/user-action`; a client-sent `user_id` is ignored
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserActionRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "event_type is required"),
        custom(function = "input_validation::rules::event_type")
    )]
    #[schema(example = "session_scrolled_3")]
    pub event_type: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "user_agent is required"))]
    #[schema(example = "Chrome")]
    pub user_agent: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "device_type is required"),
        custom(function = "input_validation::rules::device_type")
    )]
    #[schema(example = "mobile")]
    pub device_type: String,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
}

impl UserActionRequest {
    pub fn into_new_action(self) -> Result<NewUserAction> {
        self.validate()?;

        let event_type = self
            .event_type
            .parse::<EventType>()
            .map_err(|e| AnalyticsError::Validation(e.to_string()))?;
        let device_type = self
            .device_type
            .parse::<DeviceType>()
            .map_err(|e| AnalyticsError::Validation(e.to_string()))?;

        Ok(NewUserAction {
            event_type,
            user_agent: self.user_agent,
            device_type,
            event_time: self.event_time.unwrap_or_else(Utc::now),
        })
    }
}

/// Textual success body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
