//! Indexing dispatcher.
//!
//! Submits every record of a batch independently and waits for all of them
//! to settle. A failed submission is recorded and logged; it never stops the
//! others and never surfaces as an error to the caller.

use futures::future::join_all;
use futures::stream::{self, StreamExt};

use crate::indexing::Indexer;
use crate::models::{AggregateOutcome, DispatchOutcome, ListingRecord};

/// Service for fanning a batch out to an indexer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexingDispatcher {
    max_concurrent: Option<usize>,
}

impl IndexingDispatcher {
    /// Dispatcher that submits the whole batch at once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with at most `limit` submissions in flight.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            max_concurrent: limit.map(|n| n.max(1)),
        }
    }

    /// Submit every record and aggregate the settled outcomes.
    pub async fn dispatch(
        &self,
        batch: &[ListingRecord],
        indexer: &dyn Indexer,
        container_id: &str,
    ) -> AggregateOutcome {
        log::info!(
            "Starting indexing of {} properties for source {}",
            batch.len(),
            container_id
        );

        // Owned texts keep the futures free of borrows into the batch.
        let submissions = batch
            .iter()
            .map(ListingRecord::description)
            .map(|text| async move {
                match indexer.submit(container_id, &text).await {
                    Ok(()) => DispatchOutcome::Fulfilled,
                    Err(e) => DispatchOutcome::Rejected(e.to_string()),
                }
            });

        let outcomes: Vec<DispatchOutcome> = match self.max_concurrent {
            None => join_all(submissions).await,
            Some(limit) => stream::iter(submissions).buffered(limit).collect().await,
        };

        let aggregate = AggregateOutcome::from_outcomes(outcomes);
        log::info!(
            "Successfully processed {} of {} properties",
            aggregate.succeeded,
            aggregate.total
        );
        for failure in &aggregate.failures {
            log::error!(
                "Error processing property {}: {}",
                failure.index + 1,
                failure.reason
            );
        }
        aggregate
    }
}
