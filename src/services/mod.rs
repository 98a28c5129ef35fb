//! Service layer for the watcher.
//!
//! This module contains the page retrieval logic (`EntryFetcher`) behind the
//! `EntrySource` seam used by the watch pipeline.

mod entries;

pub use entries::{CompiledSelectors, EntryFetcher, EntrySource, parse_entries};
