//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::PageSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Page retrieval and parsing settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Push delivery settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Persisted state location
    #[serde(default)]
    pub state: StateConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.fetcher.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "fetcher.url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::config("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::config("fetcher.timeout_secs must be > 0"));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(AppError::config("notifier.timeout_secs must be > 0"));
        }
        if self.fetcher.selectors.all().iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::config("fetcher.selectors must not be empty"));
        }
        if self.fetcher.selectors.link_attr.trim().is_empty() {
            return Err(AppError::config("fetcher.selectors.link_attr is empty"));
        }
        if self.state.file.as_os_str().is_empty() {
            return Err(AppError::config("state.file is empty"));
        }
        Ok(())
    }
}

/// HTTP retrieval and page structure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Listing page to watch
    #[serde(default = "defaults::url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub selectors: PageSelectors,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::fetch_timeout(),
            selectors: PageSelectors::default(),
        }
    }
}

/// Push delivery settings. Credentials come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,

    /// Alert sound name
    #[serde(default = "defaults::sound")]
    pub sound: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::notify_timeout(),
            sound: defaults::sound(),
        }
    }
}

/// Where the state record lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// State file, relative to the storage directory unless absolute
    #[serde(default = "defaults::state_file")]
    pub file: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            file: defaults::state_file(),
        }
    }
}

impl StateConfig {
    /// Resolve the state file against the storage directory.
    pub fn path_in(&self, storage_dir: &Path) -> PathBuf {
        storage_dir.join(&self.file)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn url() -> String {
        "https://revistacastells.cat/castells-hora-a-hora/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; castells-watch/0.1)".into()
    }
    pub fn fetch_timeout() -> u64 {
        30
    }
    pub fn notify_timeout() -> u64 {
        10
    }
    pub fn sound() -> String {
        "default".into()
    }
    pub fn state_file() -> PathBuf {
        PathBuf::from("last_seen.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = Config::default();
        config.fetcher.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.notifier.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_selector() {
        let mut config = Config::default();
        config.fetcher.selectors.item = " ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = Config::default();
        config.fetcher.url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));

        config.fetcher.url = "ftp://example.com/".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetcher]
            timeout_secs = 5

            [fetcher.selectors]
            item = "article"

            [state]
            file = "/var/lib/castells/state.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.fetcher.url, defaults::url());
        assert_eq!(config.fetcher.selectors.item, "article");
        assert_eq!(config.fetcher.selectors.container, ".castells-hora-a-hora");
        assert_eq!(config.notifier.timeout_secs, 10);
        assert_eq!(config.notifier.sound, "default");
        assert_eq!(
            config.state.path_in(Path::new("storage")),
            PathBuf::from("/var/lib/castells/state.json")
        );
    }

    #[test]
    fn state_path_is_relative_to_storage_dir() {
        let config = Config::default();
        assert_eq!(
            config.state.path_in(Path::new("storage")),
            PathBuf::from("storage/last_seen.json")
        );
    }

    #[test]
    fn load_or_default_falls_back_when_missing() {
        let config = Config::load_or_default("/nonexistent/castells/config.toml");
        assert_eq!(config.fetcher.url, defaults::url());
    }
}
