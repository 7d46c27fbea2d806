//! Run configuration assembled from CLI flags and environment

use std::env;

use crate::core::rate_limiter::{RateLimitConfig, RateLimiter};
use crate::core::retry::RetryPolicy;
use crate::core::{DuplicateFinder, PairwiseComparator};
use crate::error::{FinderError, FinderResult};
use crate::services::hubspot_client::{CrmBackoff, HUBSPOT_BASE_URL, HubSpotClient};
use crate::services::openai_provider::{DEFAULT_MODEL, OPENAI_BASE_URL, OpenAiProvider};
use crate::traits::CompletionProvider;

pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Everything needed to wire one duplicate-finding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    pub classifier_rate_limit: RateLimitConfig,
    pub crm_rate_limit: RateLimitConfig,
    pub retry: RetryPolicy,
    pub crm_backoff: CrmBackoff,
    pub max_in_flight: usize,
    pub model: String,
    pub openai_base_url: String,
    pub hubspot_base_url: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            classifier_rate_limit: RateLimitConfig::CLASSIFIER,
            crm_rate_limit: RateLimitConfig::CRM,
            retry: RetryPolicy::default(),
            crm_backoff: CrmBackoff::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            model: DEFAULT_MODEL.to_string(),
            openai_base_url: OPENAI_BASE_URL.to_string(),
            hubspot_base_url: HUBSPOT_BASE_URL.to_string(),
        }
    }
}

impl FinderConfig {
    /// Apply `OPENAI_BASE_URL` / `HUBSPOT_BASE_URL` overrides when present
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            self.openai_base_url = url;
        }
        if let Ok(url) = env::var("HUBSPOT_BASE_URL") {
            self.hubspot_base_url = url;
        }
        self
    }

    /// Build the engine around any completion provider
    pub fn build_finder<P: CompletionProvider>(&self, provider: P) -> DuplicateFinder<P> {
        let limiter = RateLimiter::new("classifier", self.classifier_rate_limit);
        let comparator = PairwiseComparator::new(provider, limiter, self.retry);
        DuplicateFinder::new(comparator, self.max_in_flight)
    }

    pub fn openai_provider(&self, api_key: String) -> OpenAiProvider {
        OpenAiProvider::new(api_key, self.model.clone()).with_base_url(self.openai_base_url.clone())
    }

    pub fn hubspot_client(&self, access_token: String) -> HubSpotClient {
        HubSpotClient::new(access_token)
            .with_base_url(self.hubspot_base_url.clone())
            .with_rate_limit(self.crm_rate_limit)
            .with_backoff(self.crm_backoff)
    }
}

/// Read a required secret from the environment
pub fn required_env(name: &str) -> FinderResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(FinderError::ConfigError {
            message: format!("{name} must be set (environment or .env file)"),
        }),
    }
}
