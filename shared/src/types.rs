//! Core shared types: records, pairwise verdicts and duplicate reports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for a missing company, owner or stage
pub const UNKNOWN: &str = "Unknown";

/// Verdicts must score strictly above this value to count as a duplicate
pub const QUALIFYING_THRESHOLD: u32 = 50;

/// A normalized deal handed over by the CRM collaborator
///
/// `amount` and `close_date` are kept as the CRM renders them and only ever
/// compared for exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub amount: String,
    pub close_date: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub companies: Vec<String>,
}

impl Record {
    /// First associated company, or [`UNKNOWN`] when the deal has none
    pub fn primary_company(&self) -> &str {
        self.companies.first().map(String::as_str).unwrap_or(UNKNOWN)
    }

    pub fn stage_or_unknown(&self) -> &str {
        self.stage.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.primary_company())
    }
}

/// Result of comparing a subject record against one other record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairVerdict {
    pub other_name: String,
    pub other_company: String,
    pub score: u32,
    pub explanation: String,
}

impl PairVerdict {
    pub fn new(other: &Record, score: u32, explanation: impl Into<String>) -> Self {
        Self {
            other_name: other.name.clone(),
            other_company: other.primary_company().to_string(),
            score,
            explanation: explanation.into(),
        }
    }

    /// Zero-score verdict carrying the reason the pair was ruled out
    pub fn rejected(other: &Record, explanation: impl Into<String>) -> Self {
        Self::new(other, 0, explanation)
    }

    pub fn is_qualifying(&self) -> bool {
        self.score > QUALIFYING_THRESHOLD
    }
}

impl fmt::Display for PairVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) ({}%): {}",
            self.other_name, self.other_company, self.score, self.explanation
        )
    }
}

/// Per-record summary of its qualifying duplicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub record: Record,
    /// Qualifying verdicts in comparison order
    pub matches: Vec<PairVerdict>,
    /// Highest qualifying score, 0 when nothing qualifies
    pub score: u32,
    pub top_match: Option<PairVerdict>,
}

impl DuplicateReport {
    pub fn has_duplicates(&self) -> bool {
        !self.matches.is_empty()
    }

    /// `"<name> (<company>) (<score>%): <explanation>"` for every match, joined by `"; "`
    pub fn formatted_matches(&self) -> String {
        self.matches
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Flat projection of a [`DuplicateReport`] for the reporting collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Close Date")]
    pub close_date: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Potential %")]
    pub potential_percentage: u32,
    #[serde(rename = "Top Duplicate Deal")]
    pub top_duplicate: String,
    #[serde(rename = "Top Duplicate Deal - Company")]
    pub top_duplicate_company: String,
    #[serde(rename = "Potential Duplicates")]
    pub potential_duplicates: String,
}

impl From<&DuplicateReport> for ReportRow {
    fn from(report: &DuplicateReport) -> Self {
        let record = &report.record;
        let (top_duplicate, top_duplicate_company) = match &report.top_match {
            Some(top) => (top.other_name.clone(), top.other_company.clone()),
            None => (String::new(), String::new()),
        };

        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            company: record.primary_company().to_string(),
            close_date: record.close_date.clone(),
            amount: record.amount.clone(),
            stage: record.stage_or_unknown().to_string(),
            owner: record.owner.clone(),
            potential_percentage: report.score,
            top_duplicate,
            top_duplicate_company,
            potential_duplicates: report.formatted_matches(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, companies: &[&str]) -> Record {
        Record {
            id: "1".to_string(),
            name: name.to_string(),
            owner: "owner@example.com".to_string(),
            amount: "1000".to_string(),
            close_date: "2024-06-30".to_string(),
            stage: None,
            companies: companies.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_primary_company_is_first_association() {
        let deal = record("Renewal", &["Acme", "Globex"]);
        assert_eq!(deal.primary_company(), "Acme");
    }

    #[test]
    fn test_primary_company_defaults_to_unknown() {
        let deal = record("Renewal", &[]);
        assert_eq!(deal.primary_company(), UNKNOWN);
        assert_eq!(deal.stage_or_unknown(), UNKNOWN);
    }

    #[test]
    fn test_threshold_is_strict() {
        let other = record("Other", &["Acme"]);
        assert!(!PairVerdict::new(&other, 50, "borderline").is_qualifying());
        assert!(PairVerdict::new(&other, 51, "above").is_qualifying());
    }

    #[test]
    fn test_report_row_with_matches() {
        let subject = record("Renewal", &["Acme"]);
        let b = PairVerdict::new(&record("Renewal copy", &["Acme"]), 100, "Same company and date");
        let c = PairVerdict::new(&record("Upsell", &["Acme"]), 100, "Same company and amount");
        let report = DuplicateReport {
            record: Record { stage: Some("closedwon".to_string()), ..subject },
            matches: vec![b.clone(), c],
            score: 100,
            top_match: Some(b),
        };

        let row = ReportRow::from(&report);
        assert_eq!(row.company, "Acme");
        assert_eq!(row.stage, "closedwon");
        assert_eq!(row.potential_percentage, 100);
        assert_eq!(row.top_duplicate, "Renewal copy");
        assert_eq!(row.top_duplicate_company, "Acme");
        assert_eq!(
            row.potential_duplicates,
            "Renewal copy (Acme) (100%): Same company and date; Upsell (Acme) (100%): Same company and amount"
        );
    }

    #[test]
    fn test_report_row_without_matches() {
        let report = DuplicateReport {
            record: record("Solo", &[]),
            matches: Vec::new(),
            score: 0,
            top_match: None,
        };

        let row = ReportRow::from(&report);
        assert_eq!(row.company, UNKNOWN);
        assert_eq!(row.stage, UNKNOWN);
        assert!(row.top_duplicate.is_empty());
        assert!(row.top_duplicate_company.is_empty());
        assert!(row.potential_duplicates.is_empty());
        assert!(!report.has_duplicates());
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let json = r#"{"id":"7","name":"Deal","owner":"Unknown","amount":"","close_date":""}"#;
        let deal: Record = serde_json::from_str(json).unwrap();
        assert!(deal.companies.is_empty());
        assert!(deal.stage.is_none());
    }
}
