//! Dispatch outcomes.

use serde::Serialize;

/// Settled result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Fulfilled,
    Rejected(String),
}

/// A failed submission and the position of its record in the batch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DispatchFailure {
    pub index: usize,
    pub reason: String,
}

/// Summary of a dispatch over one batch.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AggregateOutcome {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<DispatchFailure>,
}

impl AggregateOutcome {
    /// Fold per-record outcomes, given in batch order.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = DispatchOutcome>) -> Self {
        let mut aggregate = Self::default();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            aggregate.total += 1;
            match outcome {
                DispatchOutcome::Fulfilled => aggregate.succeeded += 1,
                DispatchOutcome::Rejected(reason) => {
                    aggregate.failures.push(DispatchFailure { index, reason })
                }
            }
        }
        aggregate
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}
