//! Pairwise comparison: rule filter, then rate-limited and retried classification

use shared::{PairVerdict, Record, logging};
use crate::core::classifier::ClassifierAdapter;
use crate::core::rate_limiter::RateLimiter;
use crate::core::retry::{RetryOutcome, RetryPolicy, run_with_retry};
use crate::core::rules;
use crate::traits::CompletionProvider;
use crate::types::RuleOutcome;

pub const RATE_LIMIT_EXHAUSTED: &str = "Error: Unable to compare due to rate limiting";

/// Produces exactly one verdict per ordered pair and never fails
pub struct PairwiseComparator<P: CompletionProvider> {
    classifier: ClassifierAdapter<P>,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl<P: CompletionProvider> PairwiseComparator<P> {
    pub fn new(provider: P, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self {
            classifier: ClassifierAdapter::new(provider),
            limiter,
            retry,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub async fn compare(&self, subject: &Record, other: &Record) -> PairVerdict {
        if let RuleOutcome::Reject(verdict) = rules::evaluate(subject, other) {
            return verdict;
        }

        let classifier = &self.classifier;
        let outcome = run_with_retry(&self.retry, &self.limiter, move || classifier.classify(subject, other)).await;

        match outcome {
            RetryOutcome::Completed(verdict) => verdict,
            RetryOutcome::Failed(failure) => {
                logging::log_error("comparator", &format!("Comparing {} with {}", subject, other), &failure);
                PairVerdict::rejected(other, format!("Error: {failure}"))
            }
            RetryOutcome::Exhausted { .. } => PairVerdict::rejected(other, RATE_LIMIT_EXHAUSTED),
        }
    }
}
