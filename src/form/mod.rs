//! Form state and the static step definitions for the report wizard.
//!
//! Steps are fixed at compile time: each one names a group of fields with
//! declarative constraints, and the final step is the read-only review that
//! exposes the submit action instead of "next".

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single form answer. Checkbox-style options are stored as flags, every
/// other control as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

/// The full set of answers entered so far, keyed by field name. Mutations
/// happen in place as the user types or toggles controls; the wizard mirrors
/// a snapshot to the draft store after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), FieldValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), FieldValue::Flag(value));
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(FieldValue::Flag(true)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

/// Supported control kinds for form fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    MultiLine,
    /// Radio-style exclusive selection from a fixed option list.
    Choice(&'static [&'static str]),
    /// Checkbox toggle.
    Flag,
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// One screen's worth of grouped fields in the wizard sequence.
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

pub const INDUSTRIES: &[&str] = &[
    "Retail",
    "Manufacturing",
    "Healthcare",
    "Finance",
    "Technology",
    "Education",
    "Hospitality",
    "Other",
];

/// The wizard's fixed step sequence. Steps are never created or destroyed
/// at runtime; the last entry is the review step.
pub static STEPS: Lazy<Vec<StepSpec>> = Lazy::new(|| {
    vec![
        StepSpec {
            name: "contact",
            title: "Your details",
            fields: vec![
                FieldSpec::new("client_name", "Name", FieldKind::Text),
                FieldSpec::new("client_email", "Email", FieldKind::Email),
            ],
        },
        StepSpec {
            name: "business",
            title: "Your business",
            fields: vec![
                FieldSpec::new(
                    "industry",
                    "Business industry",
                    FieldKind::Choice(INDUSTRIES),
                ),
                FieldSpec::new(
                    "question1",
                    "What are your current data management and utilization challenges?",
                    FieldKind::MultiLine,
                ),
            ],
        },
        StepSpec {
            name: "technology",
            title: "Technology today",
            fields: vec![
                FieldSpec::new(
                    "question2",
                    "What are the areas of technology integration and inefficiency?",
                    FieldKind::MultiLine,
                ),
                FieldSpec::new(
                    "question3",
                    "What are your long-term business goals and AI's role in achieving them?",
                    FieldKind::MultiLine,
                ),
            ],
        },
        StepSpec {
            name: "outlook",
            title: "Looking ahead",
            fields: vec![
                FieldSpec::new(
                    "question4",
                    "Which business processes are still mostly manual?",
                    FieldKind::MultiLine,
                ),
                FieldSpec::new(
                    "question5",
                    "What does your team currently measure to judge success?",
                    FieldKind::MultiLine,
                ),
                FieldSpec::new(
                    "question6",
                    "What would a successful AI adoption look like one year from now?",
                    FieldKind::MultiLine,
                ),
            ],
        },
        StepSpec {
            name: "sections",
            title: "Report sections",
            fields: vec![
                FieldSpec::new(
                    "includeIntroduction",
                    "Include introduction",
                    FieldKind::Flag,
                )
                .with_optional(),
                FieldSpec::new(
                    "includeIndustryTrends",
                    "Include industry trends",
                    FieldKind::Flag,
                )
                .with_optional(),
                FieldSpec::new(
                    "includeAISolutions",
                    "Include AI solutions",
                    FieldKind::Flag,
                )
                .with_optional(),
                FieldSpec::new("includeAnalysis", "Include analysis", FieldKind::Flag)
                    .with_optional(),
                FieldSpec::new("includeConclusion", "Include conclusion", FieldKind::Flag)
                    .with_optional(),
            ],
        },
        StepSpec {
            name: "review",
            title: "Review & submit",
            fields: Vec::new(),
        },
    ]
});

pub fn step_count() -> usize {
    STEPS.len()
}

pub fn last_step() -> usize {
    STEPS.len() - 1
}

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

/// Outcome of checking one field against its declared constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCheck {
    pub key: &'static str,
    pub label: &'static str,
    pub error: Option<String>,
}

impl FieldCheck {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-field results for one step plus the aggregate verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepValidation {
    pub checks: Vec<FieldCheck>,
}

impl StepValidation {
    pub fn all_valid(&self) -> bool {
        self.checks.iter().all(FieldCheck::is_valid)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FieldCheck> {
        self.checks.iter().filter(|check| !check.is_valid())
    }
}

/// Checks every field of `step` against the current answers. A step with no
/// validatable fields is trivially valid. Never panics; the caller decides
/// the user-facing consequence of a failure.
pub fn validate_step(step: &StepSpec, form: &FormState) -> StepValidation {
    let checks = step
        .fields
        .iter()
        .map(|field| FieldCheck {
            key: field.key,
            label: field.label,
            error: check_field(field, form).err(),
        })
        .collect();
    StepValidation { checks }
}

fn check_field(field: &FieldSpec, form: &FormState) -> Result<(), String> {
    match &field.kind {
        // Checkbox presence is never a constraint violation.
        FieldKind::Flag => Ok(()),
        FieldKind::Choice(options) => match form.text(field.key) {
            Some(value) if options.iter().any(|option| *option == value) => Ok(()),
            Some(_) => Err(format!(
                "{} must be one of: {}",
                field.label,
                options.join(", ")
            )),
            None if field.required => Err(format!("{} is required", field.label)),
            None => Ok(()),
        },
        FieldKind::Email => {
            let value = form.text(field.key).unwrap_or("").trim();
            if value.is_empty() {
                if field.required {
                    Err(format!("{} is required", field.label))
                } else {
                    Ok(())
                }
            } else if EMAIL_PATTERN.is_match(value) {
                Ok(())
            } else {
                Err(format!("{} must be a valid email address", field.label))
            }
        }
        FieldKind::Text | FieldKind::MultiLine => {
            let value = form.text(field.key).unwrap_or("");
            if field.required && value.trim().is_empty() {
                Err(format!("{} is required", field.label))
            } else {
                Ok(())
            }
        }
    }
}
