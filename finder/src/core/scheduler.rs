//! Duplicate scheduler: quadratic fan-out, barrier, regroup, aggregate

use futures_util::stream::{self, StreamExt};

use shared::{DuplicateReport, PairVerdict, Record, logging};
use crate::core::aggregator;
use crate::core::comparator::PairwiseComparator;
use crate::traits::CompletionProvider;

/// All ordered pairs `(i, j)` with `i != j`, row-major
pub fn pair_indices(count: usize) -> Vec<(usize, usize)> {
    (0..count)
        .flat_map(|i| (0..count).filter(move |&j| j != i).map(move |j| (i, j)))
        .collect()
}

/// Split the flat verdict list into one bucket of `count - 1` verdicts per record
pub fn regroup(verdicts: Vec<PairVerdict>, count: usize) -> Vec<Vec<PairVerdict>> {
    let per_record = count.saturating_sub(1);
    let mut verdicts = verdicts.into_iter();
    (0..count)
        .map(|_| verdicts.by_ref().take(per_record).collect())
        .collect()
}

/// Runs every pairwise comparison of a record set and reports per record
pub struct DuplicateFinder<P: CompletionProvider> {
    comparator: PairwiseComparator<P>,
    max_in_flight: usize,
}

impl<P: CompletionProvider> DuplicateFinder<P> {
    pub fn new(comparator: PairwiseComparator<P>, max_in_flight: usize) -> Self {
        Self {
            comparator,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn comparator(&self) -> &PairwiseComparator<P> {
        &self.comparator
    }

    /// Compare every record with every other one and build a report per record
    ///
    /// At most `max_in_flight` comparisons run at once. Results are collected in
    /// generation order regardless of completion order, and no report is built
    /// before the whole batch has finished.
    pub async fn find_duplicates(&self, records: &[Record]) -> Vec<DuplicateReport> {
        let pairs = pair_indices(records.len());
        logging::log_progress(
            "scheduler",
            "Identifying potential duplicates",
            &format!("{} deals, {} comparisons", records.len(), pairs.len()),
        );

        let comparator = &self.comparator;
        let verdicts: Vec<PairVerdict> = stream::iter(pairs)
            .map(move |(i, j)| comparator.compare(&records[i], &records[j]))
            .buffered(self.max_in_flight)
            .collect()
            .await;

        let reports: Vec<DuplicateReport> = records
            .iter()
            .cloned()
            .zip(regroup(verdicts, records.len()))
            .map(|(record, bucket)| aggregator::aggregate(record, bucket))
            .collect();

        let flagged = reports.iter().filter(|report| report.has_duplicates()).count();
        logging::log_success(
            "scheduler",
            &format!("{} of {} deals have potential duplicates", flagged, reports.len()),
        );

        reports
    }
}
