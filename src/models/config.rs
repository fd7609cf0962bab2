//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::LayoutDefinition;
use crate::utils::parse_selector;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP fetch settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Downstream indexing settings
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Ordered layout catalog; empty means the built-in catalog
    #[serde(default)]
    pub layouts: Vec<LayoutDefinition>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or return defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match fs::read_to_string(&path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No config at {:?}. Using defaults.", path.as_ref());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment overrides used by the serverless entry point.
    pub fn apply_env(&mut self) {
        if let Ok(agent) = std::env::var("SCRAPER_USER_AGENT") {
            if !agent.trim().is_empty() {
                self.scraper.user_agent = agent;
            }
        }

        if let Ok(timeout) = std::env::var("SCRAPER_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.scraper.timeout_secs = secs;
            }
        }

        if let Ok(endpoint) = std::env::var("INDEXING_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.indexing.endpoint = Some(endpoint);
            }
        }
    }

    /// The active layout catalog in priority order.
    pub fn catalog(&self) -> Vec<LayoutDefinition> {
        if self.layouts.is_empty() {
            LayoutDefinition::builtin_catalog()
        } else {
            self.layouts.clone()
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.indexing.max_concurrent == Some(0) {
            return Err(AppError::validation(
                "indexing.max_concurrent must be > 0 when set",
            ));
        }
        if let Some(endpoint) = &self.indexing.endpoint {
            url::Url::parse(endpoint).map_err(|e| {
                AppError::validation(format!("indexing.endpoint '{endpoint}' is invalid: {e}"))
            })?;
        }

        let mut names = HashSet::new();
        for layout in &self.layouts {
            if !names.insert(layout.name.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate layout name '{}'",
                    layout.name
                )));
            }
            if layout.card_selector.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "layout '{}' has an empty card_selector",
                    layout.name
                )));
            }
            for selector in [
                Some(layout.card_selector.as_str()),
                Some(layout.title_selector.as_str()),
                Some(layout.price_selector.as_str()),
                layout.currency(),
                Some(layout.address_selector.as_str()),
                Some(layout.attributes_selector.as_str()),
                Some(layout.link_selector.as_str()),
            ]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            {
                parse_selector(selector)?;
            }
        }
        Ok(())
    }
}

/// HTTP fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent header for page requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Downstream indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Base URL of the indexing service; unset selects local storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Path of the per-record submission call, relative to `endpoint`
    #[serde(default = "defaults::submit_path")]
    pub submit_path: String,

    /// Path of the container creation call, relative to `endpoint`
    #[serde(default = "defaults::container_path")]
    pub container_path: String,

    /// Environment variable holding the bearer key
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,

    /// Cap on in-flight submissions; unset submits the whole batch at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,

    /// Directory used by the local backend
    #[serde(default = "defaults::local_dir")]
    pub local_dir: String,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            submit_path: defaults::submit_path(),
            container_path: defaults::container_path(),
            api_key_env: defaults::api_key_env(),
            max_concurrent: None,
            local_dir: defaults::local_dir(),
        }
    }
}

impl IndexingConfig {
    /// Read the bearer key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "ListingScraper/1.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn submit_path() -> String {
        "functions/v1/embed-and-store".into()
    }
    pub fn container_path() -> String {
        "rest/v1/knowledge_sources".into()
    }
    pub fn api_key_env() -> String {
        "INDEXING_API_KEY".into()
    }
    pub fn local_dir() -> String {
        "storage/index".into()
    }
}
