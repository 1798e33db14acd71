//! Form schemas.
//!
//! Forms arrive from HTML as strings. Each form validates into the request the
//! matching service sends, or into per-field [`ValidationErrors`] that the page
//! renders inline. Nothing reaches the network until validation passes.

mod committee;
mod evaluation;
mod event;
mod submission;
mod track;

pub use committee::*;
pub use evaluation::*;
pub use event::*;
pub use submission::*;
pub use track::*;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A form that validates into a request payload.
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationErrors>;
}

pub(crate) fn require_text(errors: &mut ValidationErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    }
    value.to_string()
}

pub(crate) fn check_length(errors: &mut ValidationErrors, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("Must be at least {min} characters."));
    } else if len > max {
        errors.add(field, format!("Must be at most {max} characters."));
    }
}

pub(crate) fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an HTML `datetime-local` value (or RFC 3339) as UTC.
pub(crate) fn parse_datetime(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    errors.add(field, "Invalid date.");
    None
}

/// Split a comma, semicolon or newline separated list; trims, drops blanks and
/// removes case-insensitive duplicates keeping the first spelling.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// HTML checkboxes post a value only when checked.
pub(crate) fn checked(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some(v) if v != "false" && v != "off")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_normalizes() {
        assert_eq!(
            split_list(" Machine Learning, vision;  machine learning\nNLP ,, "),
            vec!["Machine Learning", "vision", "NLP"]
        );
        assert!(split_list(" , ; ").is_empty());
    }

    #[test]
    fn datetime_formats() {
        let mut errors = ValidationErrors::new();
        let local = parse_datetime(&mut errors, "d", "2026-09-01T09:30").unwrap();
        let rfc = parse_datetime(&mut errors, "d", "2026-09-01T09:30:00Z").unwrap();
        assert_eq!(local, rfc);
        assert!(parse_datetime(&mut errors, "d", "2026-09-01").is_some());
        assert!(errors.is_empty());

        assert!(parse_datetime(&mut errors, "d", "tomorrow").is_none());
        assert_eq!(errors.get("d"), ["Invalid date."]);
    }

    #[test]
    fn errors_display_and_merge() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "too short");
        let mut other = ValidationErrors::new();
        other.add("abstract", "too short");
        other.add("title", "required");
        errors.merge(other);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.to_string(), "abstract: too short; title: too short; title: required");
        assert!(errors.finish(|| ()).is_err());
    }
}
