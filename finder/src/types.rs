//! Finder-specific data types

use serde::{Deserialize, Serialize};

/// Role tag of a chat message sent to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message of a classification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Score and explanation extracted from a classifier reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub score: u32,
    pub explanation: String,
}

/// Outcome of the local rule filter for one pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The pair cannot be a duplicate; the verdict is final
    Reject(shared::PairVerdict),
    /// Local rules cannot rule the pair out; ask the classifier
    Escalate,
}
