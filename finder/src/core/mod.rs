//! Duplicate-detection engine

pub mod aggregator;
pub mod classifier;
pub mod comparator;
pub mod prompt;
pub mod rate_limiter;
pub mod retry;
pub mod rules;
pub mod scheduler;

pub use classifier::ClassifierAdapter;
pub use comparator::{PairwiseComparator, RATE_LIMIT_EXHAUSTED};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use retry::{RetryOutcome, RetryPolicy, run_with_retry};
pub use scheduler::DuplicateFinder;
