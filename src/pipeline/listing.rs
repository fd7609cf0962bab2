// src/pipeline/listing.rs

//! Listing indexing pipeline.
//!
//! Scrapes a page, creates the container for its batch, acknowledges the
//! caller right away and leaves indexing to a detached task.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::indexing::{ContainerRegistry, ContainerSpec, Indexer, LISTING_KIND};
use crate::models::{AggregateOutcome, Batch};
use crate::services::{IndexingDispatcher, ListingScraper};
use crate::utils::get_domain;

/// Request to scrape and index one listing page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    /// Owner of the container created for the batch
    #[serde(default)]
    pub owner_id: String,

    /// Agent the indexed listings belong to
    #[serde(default)]
    pub agent_id: String,

    /// Search results page to scrape
    #[serde(default)]
    pub url: String,

    /// Base URL for resolving relative links (defaults to `url`)
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ListingRequest {
    pub fn validate(&self) -> Result<()> {
        if self.agent_id.trim().is_empty() || self.url.trim().is_empty() {
            return Err(AppError::validation("agentId and url are required"));
        }
        if self.owner_id.trim().is_empty() {
            return Err(AppError::validation("ownerId is required"));
        }
        Ok(())
    }
}

/// Immediate acknowledgment returned before indexing finishes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
    pub message: String,
    pub properties_found: usize,
}

impl Accepted {
    pub fn new(properties_found: usize) -> Self {
        Self {
            message: format!("Processing started for {properties_found} properties."),
            properties_found,
        }
    }
}

/// Error body naming the failure kind.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error: String,
    pub kind: &'static str,
}

impl From<&AppError> for ErrorPayload {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// An accepted run with its detached dispatch.
pub struct ListingRun {
    pub accepted: Accepted,
    pub container_id: String,
    /// Resolves once every submission has settled. Dropping it does not
    /// cancel the dispatch.
    pub dispatch: JoinHandle<AggregateOutcome>,
}

/// Run the listing pipeline.
///
/// Every fatal failure is returned before dispatch begins. Submission
/// failures only show up in the aggregate and the logs.
pub async fn run_listing<B>(
    scraper: &ListingScraper,
    backend: Arc<B>,
    dispatcher: IndexingDispatcher,
    request: &ListingRequest,
) -> Result<ListingRun>
where
    B: Indexer + ContainerRegistry + 'static,
{
    request.validate()?;

    let base_url = request.base_url.as_deref().unwrap_or(&request.url);
    let batch = scraper.scrape_with_base(&request.url, base_url).await?;

    let host = get_domain(&request.url).unwrap_or_else(|| request.url.clone());
    let spec = ContainerSpec {
        owner_id: request.owner_id.clone(),
        agent_id: request.agent_id.clone(),
        label: format!("Listing from {host}"),
        kind: LISTING_KIND.to_string(),
    };
    let container_id = backend.create_container(&spec).await?;

    let accepted = Accepted::new(batch.len());
    let dispatch = spawn_dispatch(batch, backend, container_id.clone(), dispatcher);

    Ok(ListingRun {
        accepted,
        container_id,
        dispatch,
    })
}

/// Hand a batch to a background task that dispatches it.
pub fn spawn_dispatch<I>(
    batch: Batch,
    indexer: Arc<I>,
    container_id: String,
    dispatcher: IndexingDispatcher,
) -> JoinHandle<AggregateOutcome>
where
    I: Indexer + 'static,
{
    tokio::spawn(async move {
        dispatcher
            .dispatch(&batch, indexer.as_ref(), &container_id)
            .await
    })
}
