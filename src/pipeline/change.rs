//! Change detection for the newest entry.
//!
//! The newest title is fingerprinted and compared with the stored
//! fingerprint to decide whether a notification is due.

use sha2::{Digest, Sha256};

use crate::models::{Entry, StateRecord};

/// Hex-encoded SHA-256 of a title.
pub fn fingerprint(title: &str) -> String {
    hex::encode(Sha256::digest(title.as_bytes()))
}

/// Outcome of comparing the newest entry against stored state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// No prior state: seed it, do not notify.
    FirstRun { record: StateRecord },
    /// Fingerprint matches the stored one.
    Unchanged,
    /// A new newest entry: notify, then store `record`.
    Changed {
        record: StateRecord,
        previous: StateRecord,
    },
}

impl Change {
    /// The record to persist, if this outcome persists anything.
    pub fn record(&self) -> Option<&StateRecord> {
        match self {
            Change::FirstRun { record } | Change::Changed { record, .. } => Some(record),
            Change::Unchanged => None,
        }
    }
}

/// Compare the newest entry against the previously stored record.
pub fn detect(previous: Option<&StateRecord>, newest: &Entry) -> Change {
    let current_hash = fingerprint(&newest.title);

    match previous {
        None => Change::FirstRun {
            record: StateRecord::new(current_hash, newest.title.clone()),
        },
        Some(prev) if prev.last_hash == current_hash => Change::Unchanged,
        Some(prev) => Change::Changed {
            record: StateRecord::new(current_hash, newest.title.clone()),
            previous: prev.clone(),
        },
    }
}
