//! Entry data structure.

use serde::{Deserialize, Serialize};

/// One block of the listing page. Newest entries come first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Entry {
    /// Entry title (whitespace-normalized link text)
    pub title: String,

    /// Short excerpt, empty when the page has none
    pub excerpt: String,

    /// Absolute URL of the entry, empty when the link has no target
    pub url: String,

    /// Date text as shown on the page, empty when absent
    pub date: String,
}

impl Entry {
    /// Create an entry with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
