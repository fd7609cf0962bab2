//! AWS Lambda entry point for Listing Scraper
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//!
//! The response goes out as soon as the page is scraped and its container
//! exists. Indexing keeps running on the runtime in the background.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use listing_scraper::{
    config::load_lambda_config,
    error::Result,
    indexing::IndexingBackend,
    pipeline::{self, ErrorPayload, ListingRequest},
    services::{IndexingDispatcher, ListingScraper},
};
use serde_json::{Value, json};
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared, read-only state built once per execution environment.
struct AppState {
    scraper: ListingScraper,
    backend: Arc<IndexingBackend>,
    dispatcher: IndexingDispatcher,
}

impl AppState {
    fn from_env() -> Result<Self> {
        let config = load_lambda_config()?;
        let scraper = ListingScraper::new(&config)?;
        let backend = IndexingBackend::from_config(&config.indexing, scraper.client().clone())?;
        Ok(Self {
            scraper,
            backend,
            dispatcher: IndexingDispatcher::with_limit(config.indexing.max_concurrent),
        })
    }
}

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Listing Scraper Lambda starting...");
    let state = Arc::new(AppState::from_env()?);

    lambda_runtime::run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(event, state).await }
    }))
    .await
}

/// Handler for AWS Lambda events.
#[instrument(skip(event, state))]
async fn handler(
    event: LambdaEvent<ListingRequest>,
    state: Arc<AppState>,
) -> std::result::Result<Value, LambdaError> {
    let (request, _context) = event.into_parts();
    info!("Scrape requested for {}", request.url);

    let result = pipeline::run_listing(
        &state.scraper,
        Arc::clone(&state.backend),
        state.dispatcher,
        &request,
    )
    .await;

    match result {
        Ok(run) => {
            info!(
                "Accepted {} properties for source {}",
                run.accepted.properties_found, run.container_id
            );
            // Dropping the handle detaches the dispatch.
            drop(run.dispatch);
            Ok(json!({ "statusCode": 202, "body": run.accepted }))
        }
        Err(e) => {
            error!("Listing run failed: {}", e);
            Ok(json!({ "statusCode": 500, "body": ErrorPayload::from(&e) }))
        }
    }
}
