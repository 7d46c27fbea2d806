//! Reduction of a record's pairwise verdicts into its duplicate report

use shared::{DuplicateReport, PairVerdict, Record};

/// Keep verdicts scoring above the threshold and pick the first highest one
pub fn aggregate(record: Record, verdicts: Vec<PairVerdict>) -> DuplicateReport {
    let matches: Vec<PairVerdict> = verdicts.into_iter().filter(PairVerdict::is_qualifying).collect();

    let top_match = matches
        .iter()
        .fold(None::<&PairVerdict>, |best, verdict| match best {
            Some(current) if current.score >= verdict.score => Some(current),
            _ => Some(verdict),
        })
        .cloned();

    let score = top_match.as_ref().map_or(0, |top| top.score);

    DuplicateReport {
        record,
        matches,
        score,
        top_match,
    }
}
