//! Utility functions and helpers.

pub mod http;

use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_bytes` bytes on a grapheme boundary.
///
/// When cutting is needed, a trailing ellipsis is appended and counted
/// against the limit.
pub fn truncate_graphemes(text: &str, max_bytes: usize) -> String {
    const ELLIPSIS: &str = "…";

    if text.len() <= max_bytes {
        return text.to_string();
    }

    let budget = max_bytes.saturating_sub(ELLIPSIS.len());
    let mut out = String::with_capacity(max_bytes);
    for g in text.graphemes(true) {
        if out.len() + g.len() > budget {
            break;
        }
        out.push_str(g);
    }
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    if max_bytes >= ELLIPSIS.len() {
        out.push_str(ELLIPSIS);
    }
    out
}
