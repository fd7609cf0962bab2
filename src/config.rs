// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the configuration
//! for each entry point.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load and validate configuration from a TOML file.
///
/// Falls back to defaults only when the file is missing. A file that fails
/// to parse or to validate is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path)?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config {}: {e}", path.display())))?;
    Ok(config)
}

/// Load configuration for the serverless environment.
///
/// Reads the file named by `CONFIG_PATH` when set, then applies environment
/// overrides.
pub fn load_lambda_config() -> Result<Config> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::load(&path)?,
        Err(_) => Config::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.scraper.timeout_secs, 30);
    }

    #[test]
    fn test_load_config_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[layouts]]\nname = \"Cards\ncard_selector = \"li\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(AppError::Toml(_))));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scraper]\ntimeout_secs = 0").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_load_config_reads_layouts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[layouts]]
name = "Cards"
card_selector = "li.card"
title_selector = "h3"
price_selector = ".amount"
"#
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.catalog()[0].name, "Cards");
    }
}
