// src/services/page.rs

//! Listing page scraper.
//!
//! Fetches a search results page, commits to one layout and extracts a
//! record per card.

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Batch, Config};
use crate::services::{LayoutDetector, RecordExtractor};
use crate::utils::http::{create_async_client, fetch_document, parse_document};

/// Service for scraping listing records from a page.
#[derive(Clone)]
pub struct ListingScraper {
    client: Client,
    detector: Arc<LayoutDetector>,
}

impl ListingScraper {
    /// Create a scraper with its own HTTP client and the configured catalog.
    pub fn new(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.scraper)?;
        let detector = LayoutDetector::new(config.catalog())?;
        Ok(Self::with_parts(client, Arc::new(detector)))
    }

    /// Create a scraper from an existing client and detector.
    pub fn with_parts(client: Client, detector: Arc<LayoutDetector>) -> Self {
        Self { client, detector }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Scrape a page, resolving links against the page URL itself.
    pub async fn scrape(&self, url: &str) -> Result<Batch> {
        self.scrape_with_base(url, url).await
    }

    /// Scrape a page, resolving links against `base_url`.
    pub async fn scrape_with_base(&self, url: &str, base_url: &str) -> Result<Batch> {
        let base = Url::parse(base_url)?;
        let html = fetch_document(&self.client, url).await?;
        self.scrape_html(&html, &base)
    }

    /// Extract records from an already retrieved page body.
    pub fn scrape_html(&self, html: &str, base_url: &Url) -> Result<Batch> {
        let document = parse_document(html)?;
        let detection = self.detector.detect(&document)?;
        let batch = RecordExtractor::new(base_url.clone()).extract_detection(&detection);

        if batch.is_empty() {
            return Err(AppError::EmptyResult);
        }
        log::info!(
            "Extracted {} properties with layout '{}'",
            batch.len(),
            detection.layout.name()
        );
        Ok(batch)
    }
}
