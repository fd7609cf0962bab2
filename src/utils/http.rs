// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::ScraperConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body, rejecting error statuses and non-HTML responses.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::retrieval(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::retrieval(url, format!("status {status}")));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !content_type.contains("text/html") {
        return Err(AppError::retrieval(
            url,
            format!("expected text/html, got '{content_type}' (status {status})"),
        ));
    }

    response.text().await.map_err(|e| AppError::retrieval(url, e))
}

/// Parse a page body into a traversable document.
pub fn parse_document(html: &str) -> Result<Html> {
    if html.trim().is_empty() {
        return Err(AppError::parse("document body is empty"));
    }
    Ok(Html::parse_document(html))
}
