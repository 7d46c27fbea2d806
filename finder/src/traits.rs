//! Finder trait definitions for dependency injection

use async_trait::async_trait;

use shared::ClassifierFailure;
use crate::types::ChatMessage;

/// Text completion collaborator used to classify record pairs
#[mockall::automock]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a role-tagged conversation and return the single completion text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassifierFailure>;
}
