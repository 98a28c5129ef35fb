// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Create a configured asynchronous HTTP client for page retrieval.
pub fn create_client(config: &FetcherConfig) -> Result<Client> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}

/// Fetch a page body as text, failing on any non-success status.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::retrieval(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::retrieval(url, format!("HTTP {status}")));
    }

    response.text().await.map_err(|e| AppError::retrieval(url, e))
}
