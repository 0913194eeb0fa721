//! Submission lifecycle: validate, serialize, POST, interpret the response.
//!
//! The controller is a small state machine, `Idle -> Submitting ->
//! {Succeeded, back to Idle}`. Success is terminal for the session and
//! clears the persisted draft; every failure returns to `Idle` with the
//! draft intact so the user can resubmit.

pub mod http;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::WizardError;
use crate::form::{validate_step, FieldCheck, FieldValue, FormState, StepSpec};
use crate::storage::DraftStore;

/// Section toggles sent explicitly with every request. A flag checked in
/// the form maps to `true`, anything else to `false`.
pub const SECTION_FLAGS: &[&str] = &[
    "includeIntroduction",
    "includeIndustryTrends",
    "includeAISolutions",
    "includeAnalysis",
    "includeConclusion",
];

pub const GENERIC_FAILURE: &str = "An error occurred, please try again.";

/// Raw response body from the report service. The service wraps failures in
/// the same envelope, so every field is optional except `status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub doc_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A successfully generated report with the download target already
/// resolved against the service origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportReady {
    pub download_url: String,
    pub report_id: Option<String>,
    pub doc_url: Option<String>,
}

/// Transport edge of the submission flow.
pub trait ReportClient {
    /// Sends one report-generation request. Errors cover transport and
    /// non-2xx failures; protocol interpretation happens in the controller.
    fn generate(&self, payload: &Value) -> std::result::Result<ReportResponse, WizardError>;

    /// Resolves a service-relative path (such as a returned `pdf_url`)
    /// against the service origin. The default keeps the path as-is for
    /// clients without a meaningful origin.
    fn resolve_url(&self, path: &str) -> String {
        path.to_string()
    }

    /// Looks up a previously generated report by id.
    fn fetch_report(&self, report_id: &str) -> std::result::Result<Value, WizardError> {
        let _ = report_id;
        Err(WizardError::Protocol(
            "report lookup is not supported by this client".into(),
        ))
    }
}

/// Cosmetic hooks fired on submission state transitions. Purely
/// presentational; the state machine never waits on an effect and reaches
/// its terminal states even if every hook is a no-op.
pub trait TransitionEffects {
    fn entered_submitting(&mut self) {}
    fn entered_success(&mut self, _report: &ReportReady) {}
    fn entered_error(&mut self, _message: &str) {}
}

/// Effects that do nothing, for headless use.
#[derive(Debug, Default)]
pub struct NoopEffects;

impl TransitionEffects for NoopEffects {}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded(ReportReady),
}

/// Outcome of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; no request was made.
    Rejected(Vec<FieldCheck>),
    Completed(ReportReady),
    /// The request failed or the response was not a usable success. The
    /// controller is back in `Idle` and the draft is retained.
    Failed(String),
}

pub struct SubmissionController<C: ReportClient> {
    state: SubmitState,
    client: C,
}

impl<C: ReportClient> SubmissionController<C> {
    pub fn new(client: C) -> Self {
        Self {
            state: SubmitState::Idle,
            client,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs the full submit lifecycle for the active (final) step. Exactly
    /// one network call is made per accepted invocation; re-entry while a
    /// request is in flight or after success is rejected without touching
    /// the network, closing the duplicate-submission window.
    pub fn submit(
        &mut self,
        step: &StepSpec,
        form: &FormState,
        store: &dyn DraftStore,
        effects: &mut dyn TransitionEffects,
    ) -> SubmitOutcome {
        match self.state {
            SubmitState::Submitting => {
                return SubmitOutcome::Failed("A submission is already in progress.".into());
            }
            SubmitState::Succeeded(_) => {
                return SubmitOutcome::Failed("The report was already generated.".into());
            }
            SubmitState::Idle => {}
        }

        let validation = validate_step(step, form);
        if !validation.all_valid() {
            return SubmitOutcome::Rejected(
                validation
                    .checks
                    .into_iter()
                    .filter(|check| !check.is_valid())
                    .collect(),
            );
        }

        self.state = SubmitState::Submitting;
        effects.entered_submitting();
        tracing::info!("submitting report request");
        let payload = build_payload(form);

        let result = match self.client.generate(&payload) {
            Ok(response) => interpret_response(response, &self.client),
            Err(err) => {
                tracing::error!(error = %err, "report request failed");
                Err(GENERIC_FAILURE.to_string())
            }
        };

        match result {
            Ok(report) => {
                if let Err(err) = store.clear() {
                    tracing::warn!(error = %err, "failed to clear draft after submission");
                }
                self.state = SubmitState::Succeeded(report.clone());
                effects.entered_success(&report);
                SubmitOutcome::Completed(report)
            }
            Err(message) => {
                self.state = SubmitState::Idle;
                effects.entered_error(&message);
                SubmitOutcome::Failed(message)
            }
        }
    }
}

/// Flattens the form into the request body and adds the explicit section
/// booleans the service expects.
pub fn build_payload(form: &FormState) -> Value {
    let mut body = Map::new();
    for (key, value) in form.iter() {
        match value {
            FieldValue::Text(text) => {
                body.insert(key.clone(), Value::String(text.clone()));
            }
            FieldValue::Flag(flag) => {
                body.insert(key.clone(), Value::Bool(*flag));
            }
        }
    }
    for flag in SECTION_FLAGS {
        body.insert((*flag).to_string(), Value::Bool(form.flag(flag)));
    }
    Value::Object(body)
}

fn interpret_response<C: ReportClient + ?Sized>(
    response: ReportResponse,
    client: &C,
) -> std::result::Result<ReportReady, String> {
    if response.status != "success" {
        tracing::warn!(status = %response.status, "report service reported failure");
        return Err(response
            .message
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()));
    }
    match response.pdf_url {
        Some(pdf_url) if !pdf_url.trim().is_empty() => Ok(ReportReady {
            download_url: client.resolve_url(&pdf_url),
            report_id: response.report_id,
            doc_url: response.doc_url.map(|url| client.resolve_url(&url)),
        }),
        // A declared success without a download link must not be reported
        // as success.
        _ => {
            tracing::warn!("report service claimed success without a download link");
            Err("The report service did not return a download link.".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_explicit_section_booleans() {
        let mut form = FormState::new();
        form.set_text("client_name", "Ann");
        form.set_flag("includeAnalysis", true);
        let payload = build_payload(&form);
        let body = payload.as_object().expect("object body");
        assert_eq!(body["client_name"], "Ann");
        assert_eq!(body["includeAnalysis"], true);
        for flag in SECTION_FLAGS {
            assert!(body[*flag].is_boolean(), "{flag} must always be present");
        }
        assert_eq!(body["includeConclusion"], false);
    }

    #[test]
    fn success_without_a_pdf_url_is_not_a_success() {
        struct Identity;
        impl ReportClient for Identity {
            fn generate(&self, _payload: &Value) -> Result<ReportResponse, WizardError> {
                unreachable!("interpretation only")
            }
        }
        let response = ReportResponse {
            status: "success".into(),
            ..ReportResponse::default()
        };
        let result = interpret_response(response, &Identity);
        assert!(result.is_err());
    }

    #[test]
    fn server_message_is_preferred_over_the_generic_text() {
        struct Identity;
        impl ReportClient for Identity {
            fn generate(&self, _payload: &Value) -> Result<ReportResponse, WizardError> {
                unreachable!("interpretation only")
            }
        }
        let response = ReportResponse {
            status: "error".into(),
            message: Some("Industry required".into()),
            ..ReportResponse::default()
        };
        let result = interpret_response(response, &Identity);
        assert_eq!(result.unwrap_err(), "Industry required");
    }
}
