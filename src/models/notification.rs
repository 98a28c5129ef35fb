//! Notification text derived from an entry.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Entry;

/// Leading schedule clause, e.g. "Divendres 30, 11h." followed by the event name.
static TIME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+ \d+,\s*\d+h\.)\s*(.+)$").expect("time prefix pattern is valid")
});

/// Title and body of a single alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Build the alert for an entry.
    ///
    /// Schedule titles ("Divendres 30, 11h. La Nit de Castells") are split:
    /// the event name becomes the title and the time clause leads the body,
    /// followed by the excerpt when there is one. Any other title is used
    /// as-is, with the excerpt as body, or the date when the excerpt is empty.
    pub fn from_entry(entry: &Entry) -> Self {
        match split_time_prefix(&entry.title) {
            Some((prefix, remainder)) => {
                let body = if entry.excerpt.is_empty() {
                    prefix.to_string()
                } else {
                    format!("{prefix} {}", entry.excerpt)
                };
                Self::new(remainder, body)
            }
            None => {
                let body = if entry.excerpt.is_empty() {
                    &entry.date
                } else {
                    &entry.excerpt
                };
                Self::new(entry.title.clone(), body.clone())
            }
        }
    }
}

/// Split a schedule title into its time clause and the remaining text.
pub fn split_time_prefix(title: &str) -> Option<(&str, &str)> {
    let caps = TIME_PREFIX.captures(title)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}
