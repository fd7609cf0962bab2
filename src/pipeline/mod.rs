//! Pipeline entry points.
//!
//! - `run_listing`: Scrape a page, create its container, dispatch in the background

pub mod listing;

pub use listing::{
    Accepted, ErrorPayload, ListingRequest, ListingRun, run_listing, spawn_dispatch,
};
