//! Local filesystem indexing backend.
//!
//! Stores submitted records for development and testing. Production
//! deployments should use [`HttpIndexer`](super::HttpIndexer).
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── {container_id}.json    # Container metadata
//! └── {container_id}.jsonl   # One submitted record per line
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::indexing::{ContainerRegistry, ContainerSpec, Indexer};

/// Container metadata written next to its records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerMeta {
    pub id: String,
    pub owner_id: String,
    pub agent_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// A record line as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub source_id: String,
    pub text_content: String,
    pub indexed_at: DateTime<Utc>,
}

/// Local filesystem indexing backend.
pub struct LocalIndexer {
    root_dir: PathBuf,
    append_lock: Mutex<()>,
}

impl LocalIndexer {
    /// Create a new LocalIndexer rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn meta_path(&self, container_id: &str) -> PathBuf {
        self.root_dir.join(format!("{container_id}.json"))
    }

    fn records_path(&self, container_id: &str) -> PathBuf {
        self.root_dir.join(format!("{container_id}.jsonl"))
    }

    /// Load all records submitted to a container.
    pub async fn load_records(&self, container_id: &str) -> Result<Vec<StoredRecord>> {
        let path = self.records_path(container_id);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&path).await?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(AppError::from))
            .collect()
    }

    /// Load a container's metadata.
    pub async fn load_container(&self, container_id: &str) -> Result<ContainerMeta> {
        let content = tokio::fs::read_to_string(self.meta_path(container_id)).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Derive a short stable id from the container spec and creation time.
fn container_id(spec: &ContainerSpec, created_at: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    for part in [
        spec.owner_id.as_str(),
        spec.agent_id.as_str(),
        spec.label.as_str(),
        spec.kind.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(created_at.to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

#[async_trait]
impl ContainerRegistry for LocalIndexer {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let created_at = Utc::now();
        let meta = ContainerMeta {
            id: container_id(spec, &created_at),
            owner_id: spec.owner_id.clone(),
            agent_id: spec.agent_id.clone(),
            name: spec.label.clone(),
            kind: spec.kind.clone(),
            created_at,
        };

        let json = serde_json::to_string_pretty(&meta)?;
        tokio::fs::write(self.meta_path(&meta.id), json).await?;
        log::debug!("Created local container {} ({})", meta.id, meta.name);
        Ok(meta.id)
    }
}

#[async_trait]
impl Indexer for LocalIndexer {
    async fn submit(&self, container_id: &str, text: &str) -> Result<()> {
        let exists = tokio::fs::try_exists(self.meta_path(container_id))
            .await
            .map_err(AppError::submission)?;
        if !exists {
            return Err(AppError::submission(format!(
                "unknown container '{container_id}'"
            )));
        }

        let record = StoredRecord {
            source_id: container_id.to_string(),
            text_content: text.to_string(),
            indexed_at: Utc::now(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.append_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.records_path(container_id))
            .await
            .map_err(AppError::submission)?;
        file.write_all(line.as_bytes())
            .await
            .map_err(AppError::submission)?;
        file.flush().await.map_err(AppError::submission)?;
        Ok(())
    }
}
