//! Classifier adapter: one record pair in, one parsed verdict out

use shared::{ClassifierFailure, PairVerdict, Record, component_info};
use crate::core::prompt::{SYSTEM_PROMPT, build_comparison_prompt};
use crate::services::response_parser::ResponseParser;
use crate::traits::CompletionProvider;
use crate::types::ChatMessage;

pub struct ClassifierAdapter<P: CompletionProvider> {
    provider: P,
    parser: ResponseParser,
}

impl<P: CompletionProvider> ClassifierAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            parser: ResponseParser::new(),
        }
    }

    /// Ask the classifier whether `other` duplicates `subject`
    ///
    /// Transport failures are returned to the caller; a reply that does not
    /// follow the expected format still yields a (zero-score) verdict.
    pub async fn classify(&self, subject: &Record, other: &Record) -> Result<PairVerdict, ClassifierFailure> {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_comparison_prompt(subject, other)),
        ];

        let reply = self.provider.complete(&messages).await?;
        let parsed = self.parser.parse(reply.trim());
        let verdict = PairVerdict::new(other, parsed.score, parsed.explanation);

        if verdict.is_qualifying() {
            component_info!(
                "classifier",
                subject = %subject.name,
                subject_company = subject.primary_company(),
                other = %other.name,
                other_company = other.primary_company(),
                score = verdict.score,
                "Comparing {} from {} and {} from {}: {}",
                subject.name,
                subject.primary_company(),
                other.name,
                other.primary_company(),
                reply.trim()
            );
        }

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockCompletionProvider;
    use crate::types::Role;

    fn deal(name: &str) -> Record {
        Record {
            id: name.to_string(),
            name: name.to_string(),
            owner: "Unknown".to_string(),
            amount: "100".to_string(),
            close_date: "2024-05-01".to_string(),
            stage: None,
            companies: vec!["Acme".to_string()],
        }
    }

    #[tokio::test]
    async fn test_classify_parses_positive_reply() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Ok("  Percentage: 100\nExplanation: Same company and close date  ".to_string()));

        let adapter = ClassifierAdapter::new(provider);
        let verdict = adapter.classify(&deal("A"), &deal("B")).await.unwrap();

        assert_eq!(verdict.other_name, "B");
        assert_eq!(verdict.other_company, "Acme");
        assert_eq!(verdict.score, 100);
        assert_eq!(verdict.explanation, "Same company and close date");
    }

    #[tokio::test]
    async fn test_classify_sends_system_and_user_messages() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .withf(|messages| {
                messages.len() == 2
                    && messages[0].role == Role::System
                    && messages[1].role == Role::User
                    && messages[1].content.contains("- Name: A")
                    && messages[1].content.contains("- Name: B")
            })
            .times(1)
            .returning(|_| Ok("Percentage: 0\nExplanation: Amounts differ".to_string()));

        let adapter = ClassifierAdapter::new(provider);
        let verdict = adapter.classify(&deal("A"), &deal("B")).await.unwrap();

        assert_eq!(verdict.score, 0);
    }

    #[tokio::test]
    async fn test_classify_malformed_reply_is_zero() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .returning(|_| Ok("I think they might be duplicates".to_string()));

        let adapter = ClassifierAdapter::new(provider);
        let verdict = adapter.classify(&deal("A"), &deal("B")).await.unwrap();

        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.explanation, "No explanation provided");
    }

    #[tokio::test]
    async fn test_classify_propagates_transport_failure() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(ClassifierFailure::RateLimited));

        let adapter = ClassifierAdapter::new(provider);
        let result = adapter.classify(&deal("A"), &deal("B")).await;

        assert_eq!(result, Err(ClassifierFailure::RateLimited));
    }
}
