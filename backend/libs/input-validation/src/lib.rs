//! Input validation shared by the feedback and analytics services
//!
//! - `text`: email, display name and free-text message predicates
//! - `taxonomy`: the closed sets of user-action event types and device types
//! - `rules`: adapters that plug the predicates into `#[derive(Validate)]`

pub mod rules;
pub mod taxonomy;
pub mod text;

pub use rules::describe;
pub use taxonomy::{DeviceType, EventType, UnknownVariant};
pub use text::{contains_zalgo_text, validate_email, validate_message, validate_name};

/// Maximum message length, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Returns true if `value` names a known user-action event type.
pub fn validate_event_type(value: &str) -> bool {
    value.parse::<EventType>().is_ok()
}

/// Returns true if `value` is `desktop` or `mobile`.
pub fn validate_device_type(value: &str) -> bool {
    value.parse::<DeviceType>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_membership() {
        for value in [
            "visited",
            "click_try",
            "comment",
            "session_scrolled_1",
            "session_scrolled_8",
        ] {
            assert!(validate_event_type(value), "{value} should be accepted");
        }

        assert!(!validate_event_type("session_scrolled_0"));
        assert!(!validate_event_type("session_scrolled_9"));
        assert!(!validate_event_type("Visited"));
        assert!(!validate_event_type(""));
    }

    #[test]
    fn test_device_type_membership() {
        assert!(validate_device_type("desktop"));
        assert!(validate_device_type("mobile"));
        assert!(!validate_device_type("tablet"));
        assert!(!validate_device_type("Desktop"));
    }
}
