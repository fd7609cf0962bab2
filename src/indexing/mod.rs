//! Downstream indexing collaborators.
//!
//! The scraper only needs two operations from the indexing side:
//! - create a container that groups one batch of records
//! - submit one record's text into that container
//!
//! Two backends are provided:
//! - [`HttpIndexer`]: calls a remote indexing service
//! - [`LocalIndexer`]: writes JSON lines under a local directory

pub mod http;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::IndexingConfig;

pub use http::HttpIndexer;
pub use local::LocalIndexer;

/// Container kind used for listing pages.
pub const LISTING_KIND: &str = "listing";

/// Everything needed to create a container for one batch.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerSpec {
    pub owner_id: String,
    pub agent_id: String,
    pub label: String,
    pub kind: String,
}

/// Submits record text for indexing.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Submit one record's text into a container.
    async fn submit(&self, container_id: &str, text: &str) -> Result<()>;
}

/// Creates the container a batch is indexed into.
#[async_trait]
pub trait ContainerRegistry: Send + Sync {
    /// Create a container and return its identifier.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String>;
}

/// Indexing backend selected from configuration.
pub enum IndexingBackend {
    Http(HttpIndexer),
    Local(LocalIndexer),
}

impl IndexingBackend {
    /// Remote backend when an endpoint is configured, local otherwise.
    pub fn from_config(config: &IndexingConfig, client: reqwest::Client) -> Result<Arc<Self>> {
        let backend = match &config.endpoint {
            Some(_) => Self::Http(HttpIndexer::new(client, config)?),
            None => Self::Local(LocalIndexer::new(&config.local_dir)),
        };
        log::info!("Indexing backend: {}", backend.describe());
        Ok(Arc::new(backend))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(indexer) => format!("remote ({})", indexer.endpoint()),
            Self::Local(indexer) => format!("local ({})", indexer.root_dir().display()),
        }
    }
}

#[async_trait]
impl Indexer for IndexingBackend {
    async fn submit(&self, container_id: &str, text: &str) -> Result<()> {
        match self {
            Self::Http(indexer) => indexer.submit(container_id, text).await,
            Self::Local(indexer) => indexer.submit(container_id, text).await,
        }
    }
}

#[async_trait]
impl ContainerRegistry for IndexingBackend {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        match self {
            Self::Http(indexer) => indexer.create_container(spec).await,
            Self::Local(indexer) => indexer.create_container(spec).await,
        }
    }
}
