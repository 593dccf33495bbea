//! Landing-page funnel report built from per-event-type counts

use input_validation::EventType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

pub const SECTION_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActionReport {
    /// `visited` count
    pub visitors: u64,
    /// `click_try` count
    pub action_try: u64,
    /// `comment` count
    pub action_message: u64,
    /// Index `i` holds the `session_scrolled_{i+1}` count
    pub sections: Vec<u64>,
    /// Actions per device type
    pub devices: HashMap<String, u64>,
    /// Actions per user agent
    pub browsers: HashMap<String, u64>,
}

impl ActionReport {
    /// Fold event-type counts into the report; unknown event types are skipped.
    pub fn from_counts(
        counts: &HashMap<String, u64>,
        devices: HashMap<String, u64>,
        browsers: HashMap<String, u64>,
    ) -> Self {
        let mut report = Self {
            visitors: 0,
            action_try: 0,
            action_message: 0,
            sections: vec![0; SECTION_COUNT],
            devices,
            browsers,
        };

        for (event_type, &count) in counts {
            let Ok(event_type) = event_type.parse::<EventType>() else {
                tracing::debug!(%event_type, "Skipping unknown event type in report");
                continue;
            };

            match event_type {
                EventType::Visited => report.visitors += count,
                EventType::ClickTry => report.action_try += count,
                EventType::Comment => report.action_message += count,
                other => {
                    if let Some(section) = other.scroll_section() {
                        report.sections[section - 1] += count;
                    }
                }
            }
        }

        report
    }
}
