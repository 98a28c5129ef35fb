// src/error.rs

//! Unified error handling for the watcher.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Page unreachable, timed out, or answered with a non-success status
    #[error("Retrieval error for {url}: {message}")]
    Retrieval { url: String, message: String },

    /// Expected page structure not found
    #[error("Parse error: {0}")]
    Parse(String),

    /// State file unreadable, undecodable or unwritable
    #[error("Persistence error at {path}: {message}")]
    Persistence { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Push endpoint did not acknowledge the notification
    #[error("Delivery error{}: {message}", status_suffix(.status))]
    Delivery {
        status: Option<u16>,
        message: String,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl AppError {
    /// Create a retrieval error for the given URL.
    pub fn retrieval(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Retrieval {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a persistence error for the given path.
    pub fn persistence(path: &Path, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a delivery error, with the upstream status when one was received.
    pub fn delivery(status: Option<u16>, message: impl fmt::Display) -> Self {
        Self::Delivery {
            status,
            message: message.to_string(),
        }
    }

    /// Upstream HTTP status of a delivery failure, if any.
    pub fn delivery_status(&self) -> Option<u16> {
        match self {
            Self::Delivery { status, .. } => *status,
            _ => None,
        }
    }
}
