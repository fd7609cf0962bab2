// src/models/mod.rs

//! Domain models for the listing scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod layout;
mod listing;
mod outcome;

// Re-export all public types
pub use config::{Config, IndexingConfig, ScraperConfig};
pub use layout::LayoutDefinition;
pub use listing::{
    ADDRESS_PLACEHOLDER, ATTRIBUTES_PLACEHOLDER, Batch, ListingRecord, PRICE_PLACEHOLDER,
    TITLE_PLACEHOLDER,
};
pub use outcome::{AggregateOutcome, DispatchFailure, DispatchOutcome};
