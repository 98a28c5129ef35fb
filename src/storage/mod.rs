//! Storage abstractions for watcher state.
//!
//! Only one record is ever persisted: the fingerprint and title of the
//! newest entry seen so far.
//!
//! ```text
//! storage/
//! ├── config.toml        # Optional configuration
//! └── last_seen.json     # {"last_hash": "...", "last_title": "..."}
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StateRecord;

// Re-export for convenience
pub use local::LocalStateStore;

/// Trait for state storage backends.
///
/// Callers serialize runs; implementations do not lock.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last record, or `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<StateRecord>>;

    /// Replace the stored record.
    async fn save(&self, record: &StateRecord) -> Result<()>;
}
