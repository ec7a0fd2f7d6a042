// src/extractors/patterns.rs
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("Failed to compile EMAIL_RE")
});

// Optional '+', a digit, 7+ of {digit, whitespace, '-', '(', ')'}, a closing digit.
// `\s` includes newlines, so a number may run across a line break.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?\d[\d\s\-\(\)]{7,}\d")
        .expect("Failed to compile PHONE_RE")
});

/// First email-shaped substring in document order. Not validated.
pub fn first_email(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}

/// First phone-shaped substring in document order.
pub fn first_phone(text: &str) -> Option<&str> {
    PHONE_RE.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_with_country_code_and_parens() {
        assert_eq!(first_phone("Call me at +1 (555) 123-4567 today"), Some("+1 (555) 123-4567"));
    }

    #[test]
    fn test_phone_takes_first_in_document_order() {
        let text = "Home: 020 7946 0018\nMobile: +44 7700 900123";
        assert_eq!(first_phone(text), Some("020 7946 0018"));
    }

    #[test]
    fn test_short_digit_runs_are_not_phones() {
        assert_eq!(first_phone("Class of 2019, GPA 3.9, room 12-34"), None);
    }

    #[test]
    fn test_phone_stops_before_following_line_text() {
        let text = "+1-555-000-1111\nBachelor of Science";
        assert_eq!(first_phone(text), Some("+1-555-000-1111"));
    }

    #[test]
    fn test_email_first_match() {
        let text = "Contact: jane.doe+cv@mail.example.org or backup@example.net";
        assert_eq!(first_email(text), Some("jane.doe+cv@mail.example.org"));
    }

    #[test]
    fn test_email_requires_alpha_tld() {
        assert_eq!(first_email("user@host.1"), None);
        assert_eq!(first_email("no address here"), None);
    }
}
