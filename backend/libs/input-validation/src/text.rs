use once_cell::sync::Lazy;
use regex::Regex;

use crate::MAX_MESSAGE_CHARS;

// Compile regex patterns once at startup
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Zа-яА-ЯёЁ0-9\s]+$")
        .expect("hardcoded name regex is invalid - fix source code")
});

/// Validate email format (`local@domain.tld`, ASCII only, TLD of 2+ letters)
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// True if the input carries combining diacritical marks (U+0300..=U+036F)
/// or any control character.
pub fn contains_zalgo_text(input: &str) -> bool {
    input
        .chars()
        .any(|c| ('\u{0300}'..='\u{036F}').contains(&c) || c.is_control())
}

/// Validate a display name: Latin/Cyrillic letters, digits and whitespace only
pub fn validate_name(name: &str) -> bool {
    NAME_REGEX.is_match(name) && !contains_zalgo_text(name)
}

/// Validate a free-text message: 1..=500 characters, no zalgo or control characters
pub fn validate_message(message: &str) -> bool {
    let len = message.chars().count();
    len > 0 && len <= MAX_MESSAGE_CHARS && !contains_zalgo_text(message)
}
