//! Classification prompt construction

use shared::Record;

/// System message pinning the classifier to the reply format
pub const SYSTEM_PROMPT: &str = "You are a strict duplicate deal identifier. You MUST follow the given criteria exactly.\n\
Always respond in the exact format specified.";

/// Decision rule communicated verbatim to the classifier
pub const DUPLICATE_RULE: &str = "A deal is considered a duplicate if and only if ALL of these conditions are true:\n\
1. The company names are exactly the same AND\n\
2. EITHER the close dates are exactly the same OR the amounts are exactly the same\n\
\n\
If these conditions are not ALL met, the deals are not duplicates.";

/// Required two-line reply structure
pub const RESPONSE_FORMAT: &str = "Respond ONLY in the following format - no other format is a valid response from you:\n\
Percentage: [100 if all conditions are met, 0 if not]\n\
Explanation: [Brief explanation of why it is or isn't a duplicate based on the specific criteria]";

fn describe(label: &str, record: &Record) -> String {
    format!(
        "{label}:\n\
         - Name: {}\n\
         - Company: {}\n\
         - Close Date: {}\n\
         - Amount: {}\n\
         - Owner: {}",
        record.name,
        record.primary_company(),
        record.close_date,
        record.amount,
        record.owner,
    )
}

/// Build the user message asking whether `subject` and `other` are duplicates
pub fn build_comparison_prompt(subject: &Record, other: &Record) -> String {
    format!(
        "{}\n\n{}\n\nAre these deals potential duplicates?\n\n{}\n\n{}",
        describe("Deal 1", subject),
        describe("Deal 2", other),
        DUPLICATE_RULE,
        RESPONSE_FORMAT,
    )
}
