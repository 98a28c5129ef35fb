// src/pipeline/watch.rs

//! Watch pipeline: one check of the listing page.

use std::fmt;

use crate::error::Result;
use crate::models::{Entry, Notification};
use crate::notify::Notifier;
use crate::pipeline::change::{Change, detect};
use crate::services::EntrySource;
use crate::storage::StateStore;

/// Terminal state of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page listed no entries; nothing stored, nothing sent.
    NoEntries,
    /// The newest entry is the one already recorded.
    Unchanged { title: String },
    /// No prior state; the newest entry was recorded without notifying.
    FirstRun { title: String },
    /// A new entry was announced and recorded.
    Notified {
        entry: Entry,
        notification: Notification,
    },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoEntries => write!(f, "No entries found."),
            RunOutcome::Unchanged { title } => write!(f, "No changes. Latest entry: {title}"),
            RunOutcome::FirstRun { title } => {
                write!(f, "First run, initial state saved. Latest entry: {title}")
            }
            RunOutcome::Notified { notification, .. } => {
                write!(f, "Notification sent: {}", notification.title)
            }
        }
    }
}

/// Run one check: fetch, compare, and notify on a new newest entry.
///
/// State is written only after a successful send (or when seeding on the
/// first run), so a failed delivery leaves the previous record in place.
pub async fn run_watch(
    source: &dyn EntrySource,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
) -> Result<RunOutcome> {
    let entries = source.fetch_entries().await?;

    let Some(latest) = entries.into_iter().next() else {
        let outcome = RunOutcome::NoEntries;
        log::info!("{outcome}");
        return Ok(outcome);
    };

    let previous = store.load().await?;
    let outcome = match detect(previous.as_ref(), &latest) {
        Change::Unchanged => RunOutcome::Unchanged {
            title: latest.title,
        },
        Change::FirstRun { record } => {
            log::info!("New entry detected: {}", latest.title);
            store.save(&record).await?;
            RunOutcome::FirstRun {
                title: latest.title,
            }
        }
        Change::Changed { record, previous } => {
            log::info!("New entry detected: {}", latest.title);
            log::debug!("Previous entry: {}", previous.last_title);

            let notification = Notification::from_entry(&latest);
            notifier.send(&notification).await?;
            store.save(&record).await?;

            RunOutcome::Notified {
                entry: latest,
                notification,
            }
        }
    };

    log::info!("{outcome}");
    Ok(outcome)
}
