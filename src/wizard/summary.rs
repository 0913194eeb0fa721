//! Read-only recap of the key answers shown on the final step.

use crate::form::FormState;

/// (label, form key) pairs recapped before submission, in display order.
const SUMMARY_FIELDS: &[(&str, &str)] = &[
    ("Name", "client_name"),
    ("Email", "client_email"),
    ("Business Industry", "industry"),
    (
        "What are your current data management and utilization challenges?",
        "question1",
    ),
    (
        "What are the areas of technology integration and inefficiency?",
        "question2",
    ),
    (
        "What are your long-term business goals and AI's role in achieving them?",
        "question3",
    ),
];

/// Builds the summary rows from scratch. Missing answers render as empty
/// strings rather than errors, and repeated calls yield the same rows.
pub fn build(form: &FormState) -> Vec<(String, String)> {
    SUMMARY_FIELDS
        .iter()
        .map(|(label, key)| {
            (
                (*label).to_string(),
                form.text(key).unwrap_or("").to_string(),
            )
        })
        .collect()
}
