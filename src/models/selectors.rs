// src/models/selectors.rs

//! CSS selectors for scraping the entry listing page.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping the entry listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSelectors {
    /// Selector for the element holding all entry blocks
    #[serde(default = "defaults::container")]
    pub container: String,

    /// Selector for each entry block within the container
    #[serde(default = "defaults::item")]
    pub item: String,

    /// Selector for the title link within an entry block
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Selector for the optional excerpt within an entry block
    #[serde(default = "defaults::excerpt")]
    pub excerpt: String,

    /// Selector for the optional date within an entry block
    #[serde(default = "defaults::date")]
    pub date: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            container: defaults::container(),
            item: defaults::item(),
            title: defaults::title(),
            excerpt: defaults::excerpt(),
            date: defaults::date(),
            link_attr: defaults::link_attr(),
        }
    }
}

impl PageSelectors {
    /// All selector strings, for validation.
    pub fn all(&self) -> [&str; 5] {
        [
            &self.container,
            &self.item,
            &self.title,
            &self.excerpt,
            &self.date,
        ]
    }
}

mod defaults {
    pub fn container() -> String {
        ".castells-hora-a-hora".into()
    }
    pub fn item() -> String {
        ".td_module_wrap".into()
    }
    pub fn title() -> String {
        "h3.entry-title a".into()
    }
    pub fn excerpt() -> String {
        ".td-excerpt".into()
    }
    pub fn date() -> String {
        "time.entry-date".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
}
