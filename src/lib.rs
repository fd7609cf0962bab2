// src/lib.rs

//! Listing Scraper Library
//!
//! Detects the layout of a real-estate search results page, extracts one
//! record per listing card and fans the records out for indexing.

pub mod config;
pub mod error;
pub mod indexing;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
