//! OpenAI chat-completions transport for the classifier

use async_trait::async_trait;

use shared::ClassifierFailure;
use crate::traits::CompletionProvider;
use crate::types::ChatMessage;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Real completion provider backed by the OpenAI chat completions API
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Point the provider at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassifierFailure> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ClassifierFailure::Network(e.to_string()))?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                401 => Err(ClassifierFailure::Authentication),
                429 => Err(ClassifierFailure::RateLimited),
                _ => Err(ClassifierFailure::Server(response.status().to_string())),
            };
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClassifierFailure::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| ClassifierFailure::InvalidResponse("No content in response".to_string()))?;

        Ok(content.trim().to_string())
    }
}
