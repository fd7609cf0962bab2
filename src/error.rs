// src/error.rs

//! Unified error handling for the listing scraper.

use std::fmt;

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Page could not be retrieved, or the response was not an HTML page
    #[error("Retrieval failed for {url}: {message}")]
    RetrievalFailed { url: String, message: String },

    /// Document could not be turned into a traversable tree
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// No layout in the catalog matched any card on the page
    #[error(
        "Could not identify listings on the page; the site structure may not be supported"
    )]
    LayoutNotRecognized,

    /// A layout matched but no records came out of it
    #[error("No properties found at the given URL with the current layouts")]
    EmptyResult,

    /// A single record could not be submitted for indexing
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The container for a batch could not be created
    #[error("Container creation failed: {0}")]
    ContainerFailed(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a retrieval error for the given URL.
    pub fn retrieval(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::RetrievalFailed {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseFailed(message.into())
    }

    /// Create a submission error.
    pub fn submission(message: impl fmt::Display) -> Self {
        Self::SubmissionFailed(message.to_string())
    }

    /// Create a container creation error.
    pub fn container(message: impl fmt::Display) -> Self {
        Self::ContainerFailed(message.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable name of the failure kind, used in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RetrievalFailed { .. } | Self::Http(_) => "RetrievalFailed",
            Self::ParseFailed(_) => "ParseFailed",
            Self::LayoutNotRecognized => "LayoutNotRecognized",
            Self::EmptyResult => "EmptyResult",
            Self::SubmissionFailed(_) => "SubmissionFailed",
            Self::ContainerFailed(_) => "ContainerFailed",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Toml(_) => "Toml",
            Self::Url(_) => "InvalidUrl",
            Self::Selector { .. } => "InvalidSelector",
            Self::Config(_) => "Config",
            Self::Validation(_) => "Validation",
        }
    }
}
