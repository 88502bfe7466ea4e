//! Field normalization shared by every extractor.

use once_cell::sync::Lazy;
use regex::Regex;

static LINKEDIN_PROFILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)linkedin\.com/in/([^/?#\s]+)").expect("valid linkedin regex")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Trim and lower-case an email. `None` when the value has no `@`.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.contains('@') {
        Some(email)
    } else {
        None
    }
}

/// Canonicalize a LinkedIn profile reference.
///
/// `.../linkedin.com/in/<handle>...` becomes `https://linkedin.com/in/<handle>`;
/// any other `linkedin.com` URL is kept as given; everything else is dropped.
pub fn normalize_linkedin(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(handle) = LINKEDIN_PROFILE.captures(value).and_then(|c| c.get(1)) {
        return Some(format!("https://linkedin.com/in/{}", handle.as_str()));
    }

    if value.to_lowercase().contains("linkedin.com") {
        Some(value.to_string())
    } else {
        None
    }
}

/// Split a full name: first token, then the rest joined by single spaces.
pub fn split_full_name(raw: &str) -> (Option<String>, Option<String>) {
    let mut tokens = raw.split_whitespace();
    let first = tokens.next().map(str::to_string);
    let rest: Vec<&str> = tokens.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    (first, last)
}

/// Trimmed value, or `None` if it is empty.
pub fn non_empty(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Collapse internal whitespace runs to a single space and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}
