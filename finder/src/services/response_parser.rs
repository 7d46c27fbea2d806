//! Tolerant parsing of classifier replies

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ParsedReply;

pub const NO_EXPLANATION: &str = "No explanation provided";

static PERCENTAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Percentage:\s*([0-9]+)").expect("percentage pattern is valid"));

static EXPLANATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Explanation:\s*(.+)").expect("explanation pattern is valid"));

/// Regex-based extraction of the `Percentage:` / `Explanation:` reply lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract score and explanation, falling back to `0` and
    /// [`NO_EXPLANATION`] for whichever part is missing
    ///
    /// Percentages beyond `u32` saturate instead of being dropped.
    pub fn parse(&self, reply: &str) -> ParsedReply {
        let score = PERCENTAGE_REGEX
            .captures(reply)
            .and_then(|cap| cap.get(1))
            // Only ASCII digits reach here, so a failed parse is an overflow
            .map(|digits| digits.as_str().parse::<u32>().unwrap_or(u32::MAX))
            .unwrap_or(0);

        let explanation = EXPLANATION_REGEX
            .captures(reply)
            .and_then(|cap| cap.get(1))
            .map(|text| text.as_str().trim_end().to_string())
            .unwrap_or_else(|| NO_EXPLANATION.to_string());

        ParsedReply { score, explanation }
    }
}
