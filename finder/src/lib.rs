//! Deal duplicate finder library
//!
//! Compares every deal against every other deal, prunes obvious non-matches
//! with local rules, asks an LLM classifier about the rest under a shared rate
//! limit with bounded retries, and condenses the verdicts into one duplicate
//! report per deal.

pub mod error;
pub mod types;
pub mod traits;
pub mod config;
pub mod core;
pub mod services;

// Re-export main types
pub use error::{FinderError, FinderResult};
pub use types::*;
pub use traits::*;
pub use config::FinderConfig;
pub use crate::core::{DuplicateFinder, PairwiseComparator, RateLimitConfig, RateLimiter, RetryPolicy};
pub use services::*;
