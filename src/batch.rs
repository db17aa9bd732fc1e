//! Sequential orchestration over an ordered list of collections.

use tracing::info;

use crate::driver::{process_treebank, CollectionRequest, DriverOptions};
use crate::processor::CollectionProcessor;

/// Outcome of a batch run, collection names in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn succeeded_for(&self, name: &str) -> bool {
        self.succeeded.iter().any(|n| n == name)
    }
}

/// Run every collection, in order, each against a fresh processor.
///
/// Outcomes are independent: a failed collection never prevents the
/// remaining ones from being attempted, and nothing is retried.
pub fn run_batch<P, F>(
    mut make_processor: F,
    collections: &[CollectionRequest],
    options: &DriverOptions,
) -> BatchSummary
where
    P: CollectionProcessor,
    F: FnMut() -> P,
{
    let mut summary = BatchSummary::default();
    for request in collections {
        let mut processor = make_processor();
        if process_treebank(&mut processor, request, options) {
            summary.succeeded.push(request.name.clone());
        } else {
            summary.failed.push(request.name.clone());
        }
    }
    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "batch finished"
    );
    summary
}
