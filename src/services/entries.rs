// src/services/entries.rs

//! Entry fetcher service.
//!
//! Fetches the listing page and extracts entries using configured CSS selectors.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Entry, FetcherConfig, PageSelectors};
use crate::utils::http;
use crate::utils::{normalize_whitespace, resolve_url};

/// Anything that can produce the current entries, newest first.
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<Entry>>;
}

/// Compiled form of [`PageSelectors`].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    container_css: String,
    container: Selector,
    item: Selector,
    title: Selector,
    excerpt: Selector,
    date: Selector,
    link_attr: String,
}

impl CompiledSelectors {
    /// Parse every configured selector.
    pub fn compile(selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            container_css: selectors.container.clone(),
            container: parse_selector(&selectors.container)?,
            item: parse_selector(&selectors.item)?,
            title: parse_selector(&selectors.title)?,
            excerpt: parse_selector(&selectors.excerpt)?,
            date: parse_selector(&selectors.date)?,
            link_attr: selectors.link_attr.clone(),
        })
    }
}

/// Service for fetching entries from the listing page.
pub struct EntryFetcher {
    client: Client,
    url: Url,
    selectors: CompiledSelectors,
}

impl EntryFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
            url: Url::parse(&config.url)?,
            selectors: CompiledSelectors::compile(&config.selectors)?,
        })
    }

    /// The page being watched.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl EntrySource for EntryFetcher {
    async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        log::debug!("Fetching {}", self.url);
        let html = http::fetch_text(&self.client, self.url.as_str()).await?;
        let entries = parse_entries(&html, &self.url, &self.selectors)?;
        log::debug!("Parsed {} entries from {}", entries.len(), self.url);
        Ok(entries)
    }
}

/// Extract entries from a listing page, in page order.
///
/// Fails when the container is missing. Blocks without a title link, or with
/// an empty title, are skipped.
pub fn parse_entries(
    html: &str,
    base_url: &Url,
    selectors: &CompiledSelectors,
) -> Result<Vec<Entry>> {
    let document = Html::parse_document(html);

    let container = document.select(&selectors.container).next().ok_or_else(|| {
        AppError::parse(format!(
            "container '{}' not found in page",
            selectors.container_css
        ))
    })?;

    let entries = container
        .select(&selectors.item)
        .filter_map(|block| parse_entry_block(&block, base_url, selectors))
        .collect();

    Ok(entries)
}

fn parse_entry_block(
    block: &ElementRef,
    base_url: &Url,
    selectors: &CompiledSelectors,
) -> Option<Entry> {
    let title_elem = block.select(&selectors.title).next()?;
    let title = element_text(&title_elem);
    if title.is_empty() {
        log::debug!("Skipping entry block with empty title");
        return None;
    }

    let url = title_elem
        .value()
        .attr(&selectors.link_attr)
        .map(|href| resolve_url(base_url, href.trim()))
        .unwrap_or_default();

    let excerpt = block
        .select(&selectors.excerpt)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();
    let date = block
        .select(&selectors.date)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();

    Some(Entry {
        title,
        excerpt,
        url,
        date,
    })
}

fn element_text(elem: &ElementRef) -> String {
    let raw: String = elem.text().collect();
    normalize_whitespace(&raw)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
