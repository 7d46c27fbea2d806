//! Shared fixtures for finder integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use finder::{ChatMessage, CompletionProvider};
use shared::{ClassifierFailure, Record};

pub fn deal(id: &str, name: &str, company: &str, close_date: &str, amount: &str) -> Record {
    Record {
        id: id.to_string(),
        name: name.to_string(),
        owner: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        amount: amount.to_string(),
        close_date: close_date.to_string(),
        stage: Some("appointmentscheduled".to_string()),
        companies: vec![company.to_string()],
    }
}

/// Deal details as they appear in the comparison prompt
#[derive(Debug, PartialEq, Eq)]
struct PromptDeal {
    company: String,
    close_date: String,
    amount: String,
}

fn prompt_deals(prompt: &str) -> Vec<PromptDeal> {
    let field = |line: &str, key: &str| line.trim().strip_prefix(key).map(|v| v.trim().to_string());

    let mut deals = Vec::new();
    let mut company = None;
    let mut close_date = None;
    for line in prompt.lines() {
        if let Some(value) = field(line, "- Company:") {
            company = Some(value);
        } else if let Some(value) = field(line, "- Close Date:") {
            close_date = Some(value);
        } else if let Some(amount) = field(line, "- Amount:") {
            if let (Some(company), Some(close_date)) = (company.take(), close_date.take()) {
                deals.push(PromptDeal { company, close_date, amount });
            }
        }
    }
    deals
}

/// Deterministic classifier applying the duplicate rule to the prompt it is shown
#[derive(Clone, Default)]
pub struct RuleFollowingProvider {
    calls: Arc<AtomicUsize>,
}

impl RuleFollowingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for RuleFollowingProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassifierFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let prompt = messages
            .last()
            .map(|message| message.content.as_str())
            .ok_or_else(|| ClassifierFailure::InvalidResponse("empty conversation".to_string()))?;

        match prompt_deals(prompt).as_slice() {
            [first, second] if first.company == second.company
                && (first.close_date == second.close_date || first.amount == second.amount) =>
            {
                Ok("Percentage: 100\nExplanation: Same company with matching close date or amount".to_string())
            }
            [_, _] => Ok("Percentage: 0\nExplanation: Duplicate conditions not met".to_string()),
            _ => Err(ClassifierFailure::InvalidResponse("prompt did not describe two deals".to_string())),
        }
    }
}

/// Classifier that fails every call with the same error
#[derive(Clone)]
pub struct FailingProvider {
    failure: ClassifierFailure,
    calls: Arc<AtomicUsize>,
}

impl FailingProvider {
    pub fn new(failure: ClassifierFailure) -> Self {
        Self { failure, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ClassifierFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.failure.clone())
    }
}

/// Classifier that is rate limited for the first `failures` calls, then follows the rule
#[derive(Clone)]
pub struct FlakyProvider {
    failures: usize,
    attempts: Arc<AtomicUsize>,
    inner: RuleFollowingProvider,
}

impl FlakyProvider {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            attempts: Arc::new(AtomicUsize::new(0)),
            inner: RuleFollowingProvider::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FlakyProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassifierFailure> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(ClassifierFailure::RateLimited);
        }
        self.inner.complete(messages).await
    }
}

/// Classifier whose replies arrive in reverse subject order
///
/// Deals are expected to be named by position ("D0", "D1", ...). The subject
/// at position `i` of `count` waits `(count - i) * step` before answering, and
/// only pairs whose other deal is `target` score 100.
#[derive(Clone)]
pub struct ReverseDelayProvider {
    count: usize,
    step: Duration,
    target: String,
}

impl ReverseDelayProvider {
    pub fn new(count: usize, step: Duration, target: impl Into<String>) -> Self {
        Self { count, step, target: target.into() }
    }
}

fn prompt_names(prompt: &str) -> Vec<String> {
    prompt
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- Name:"))
        .map(|name| name.trim().to_string())
        .collect()
}

#[async_trait]
impl CompletionProvider for ReverseDelayProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassifierFailure> {
        let prompt = messages.last().map(|message| message.content.as_str()).unwrap_or_default();
        let [subject, other]: [String; 2] = prompt_names(prompt)
            .try_into()
            .map_err(|_| ClassifierFailure::InvalidResponse("prompt did not name two deals".to_string()))?;

        let position: usize = subject
            .trim_start_matches('D')
            .parse()
            .map_err(|_| ClassifierFailure::InvalidResponse(format!("unexpected deal name {subject}")))?;
        let remaining = u32::try_from(self.count.saturating_sub(position)).unwrap_or(u32::MAX);
        tokio::time::sleep(self.step * remaining).await;

        if other == self.target {
            Ok(format!("Percentage: 100\nExplanation: {subject} duplicates {other}"))
        } else {
            Ok("Percentage: 0\nExplanation: Not the target deal".to_string())
        }
    }
}
