//! Closed vocabularies accepted by the user-action endpoint

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Kind of interaction a visitor performed on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EventType {
    #[serde(rename = "visited")]
    Visited,
    #[serde(rename = "click_try")]
    ClickTry,
    #[serde(rename = "comment")]
    Comment,
    #[serde(rename = "session_scrolled_1")]
    SessionScrolled1,
    #[serde(rename = "session_scrolled_2")]
    SessionScrolled2,
    #[serde(rename = "session_scrolled_3")]
    SessionScrolled3,
    #[serde(rename = "session_scrolled_4")]
    SessionScrolled4,
    #[serde(rename = "session_scrolled_5")]
    SessionScrolled5,
    #[serde(rename = "session_scrolled_6")]
    SessionScrolled6,
    #[serde(rename = "session_scrolled_7")]
    SessionScrolled7,
    #[serde(rename = "session_scrolled_8")]
    SessionScrolled8,
}

impl EventType {
    pub const ALL: [EventType; 11] = [
        EventType::Visited,
        EventType::ClickTry,
        EventType::Comment,
        EventType::SessionScrolled1,
        EventType::SessionScrolled2,
        EventType::SessionScrolled3,
        EventType::SessionScrolled4,
        EventType::SessionScrolled5,
        EventType::SessionScrolled6,
        EventType::SessionScrolled7,
        EventType::SessionScrolled8,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Visited => "visited",
            EventType::ClickTry => "click_try",
            EventType::Comment => "comment",
            EventType::SessionScrolled1 => "session_scrolled_1",
            EventType::SessionScrolled2 => "session_scrolled_2",
            EventType::SessionScrolled3 => "session_scrolled_3",
            EventType::SessionScrolled4 => "session_scrolled_4",
            EventType::SessionScrolled5 => "session_scrolled_5",
            EventType::SessionScrolled6 => "session_scrolled_6",
            EventType::SessionScrolled7 => "session_scrolled_7",
            EventType::SessionScrolled8 => "session_scrolled_8",
        }
    }

    /// Page section reached, 1-based, for the `session_scrolled_N` family
    pub fn scroll_section(&self) -> Option<usize> {
        match self {
            EventType::SessionScrolled1 => Some(1),
            EventType::SessionScrolled2 => Some(2),
            EventType::SessionScrolled3 => Some(3),
            EventType::SessionScrolled4 => Some(4),
            EventType::SessionScrolled5 => Some(5),
            EventType::SessionScrolled6 => Some(6),
            EventType::SessionScrolled7 => Some(7),
            EventType::SessionScrolled8 => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "event type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(DeviceType::Desktop),
            "mobile" => Ok(DeviceType::Mobile),
            other => Err(UnknownVariant {
                kind: "device type",
                value: other.to_string(),
            }),
        }
    }
}
