//! Service layer for the listing scraper.
//!
//! This module contains the business logic for:
//! - Layout detection (`LayoutDetector`)
//! - Record extraction (`RecordExtractor`)
//! - Page scraping (`ListingScraper`)
//! - Indexing fan-out (`IndexingDispatcher`)

mod detector;
mod dispatcher;
mod extractor;
mod page;

pub use detector::{CompiledLayout, Detection, LayoutDetector};
pub use dispatcher::IndexingDispatcher;
pub use extractor::RecordExtractor;
pub use page::ListingScraper;
