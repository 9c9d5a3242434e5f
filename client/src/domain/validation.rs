//! Client-side input validation helpers.
//!
//! The stores trust their callers for most input hygiene, but the checks
//! that gate network calls live here so every screen applies the same
//! rules before submitting.

use std::sync::OnceLock;

use regex::Regex;

use super::StoreError;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is the server's concern.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Require a non-empty value once trimmed of whitespace.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] naming the offending field.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Require a plausibly shaped email address.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] when the address fails the shape check.
pub fn require_email(value: &str) -> Result<(), StoreError> {
    if !email_regex().is_match(value.trim()) {
        return Err(StoreError::validation(format!(
            "'{value}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Split multi-line editor text into ordered preparation steps.
///
/// Blank lines are dropped and each step is trimmed, so the resulting
/// sequence matches the shape of fetched recipes.
pub fn split_instructions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
