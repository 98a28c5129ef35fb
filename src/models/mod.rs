// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entry;
mod notification;
mod selectors;
mod state;

// Re-export all public types
pub use config::{Config, FetcherConfig, NotifierConfig, StateConfig};
pub use entry::Entry;
pub use notification::{Notification, split_time_prefix};
pub use selectors::PageSelectors;
pub use state::StateRecord;
