use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use report_wizard::errors::WizardError;
use report_wizard::form::{self, FormState};
use report_wizard::storage::{DraftStore, JsonDraftStore};
use report_wizard::submit::{
    NoopEffects, ReportClient, ReportReady, ReportResponse, SubmissionController, SubmitOutcome,
    SubmitState, TransitionEffects, GENERIC_FAILURE,
};
use serde_json::Value;
use tempfile::TempDir;

struct MockClient {
    responses: RefCell<VecDeque<Result<ReportResponse, WizardError>>>,
    calls: Cell<usize>,
    payloads: RefCell<Vec<Value>>,
}

impl MockClient {
    fn with(response: Result<ReportResponse, WizardError>) -> Self {
        let mut responses = VecDeque::new();
        responses.push_back(response);
        Self {
            responses: RefCell::new(responses),
            calls: Cell::new(0),
            payloads: RefCell::new(Vec::new()),
        }
    }
}

impl ReportClient for MockClient {
    fn generate(&self, payload: &Value) -> Result<ReportResponse, WizardError> {
        self.calls.set(self.calls.get() + 1);
        self.payloads.borrow_mut().push(payload.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ReportResponse::default()))
    }
}

#[derive(Default)]
struct RecordingEffects {
    transitions: Vec<String>,
}

impl TransitionEffects for RecordingEffects {
    fn entered_submitting(&mut self) {
        self.transitions.push("submitting".into());
    }
    fn entered_success(&mut self, _report: &ReportReady) {
        self.transitions.push("success".into());
    }
    fn entered_error(&mut self, _message: &str) {
        self.transitions.push("error".into());
    }
}

fn seeded_store() -> (JsonDraftStore, FormState, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let store = JsonDraftStore::new(temp.path().join("draft")).expect("draft store");
    let mut formv = FormState::new();
    formv.set_text("client_name", "Ann");
    formv.set_text("client_email", "a@b.com");
    formv.set_text("industry", "Retail");
    formv.set_text("question1", "Q1");
    formv.set_text("question2", "Q2");
    formv.set_text("question3", "Q3");
    store.save(&formv, form::last_step()).expect("seed draft");
    (store, formv, temp)
}

fn final_step() -> &'static form::StepSpec {
    &form::STEPS[form::last_step()]
}

fn success_response() -> ReportResponse {
    ReportResponse {
        status: "success".into(),
        pdf_url: Some("/reports/42.pdf".into()),
        report_id: Some("42".into()),
        ..ReportResponse::default()
    }
}

#[test]
fn a_successful_submission_clears_the_draft_and_exposes_the_download() {
    let (store, formv, _guard) = seeded_store();
    let mut controller = SubmissionController::new(MockClient::with(Ok(success_response())));
    let mut effects = RecordingEffects::default();

    let outcome = controller.submit(final_step(), &formv, &store, &mut effects);
    match outcome {
        SubmitOutcome::Completed(report) => {
            assert_eq!(report.download_url, "/reports/42.pdf");
            assert_eq!(report.report_id.as_deref(), Some("42"));
        }
        other => panic!("expected completion, got {other:?}"),
    }

    assert!(matches!(controller.state(), SubmitState::Succeeded(_)));
    assert!(store.restore().is_none(), "draft must be cleared on success");
    assert_eq!(effects.transitions, vec!["submitting", "success"]);
    assert_eq!(controller.client().calls.get(), 1);
}

#[test]
fn a_success_status_without_a_pdf_url_is_an_error_and_keeps_the_draft() {
    let (store, formv, _guard) = seeded_store();
    let response = ReportResponse {
        status: "success".into(),
        ..ReportResponse::default()
    };
    let mut controller = SubmissionController::new(MockClient::with(Ok(response)));

    let outcome = controller.submit(final_step(), &formv, &store, &mut NoopEffects);
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(*controller.state(), SubmitState::Idle);
    assert!(store.restore().is_some(), "draft must survive the failure");
}

#[test]
fn a_server_error_surfaces_the_server_message() {
    let (store, formv, _guard) = seeded_store();
    let response = ReportResponse {
        status: "error".into(),
        message: Some("Industry required".into()),
        ..ReportResponse::default()
    };
    let mut controller = SubmissionController::new(MockClient::with(Ok(response)));
    let mut effects = RecordingEffects::default();

    let outcome = controller.submit(final_step(), &formv, &store, &mut effects);
    assert_eq!(outcome, SubmitOutcome::Failed("Industry required".into()));
    assert_eq!(effects.transitions, vec!["submitting", "error"]);
    assert!(store.restore().is_some());
}

#[test]
fn a_transport_failure_surfaces_a_generic_message_without_panicking() {
    let (store, formv, _guard) = seeded_store();
    let mut controller = SubmissionController::new(MockClient::with(Err(
        WizardError::Protocol("connection refused".into()),
    )));

    let outcome = controller.submit(final_step(), &formv, &store, &mut NoopEffects);
    assert_eq!(outcome, SubmitOutcome::Failed(GENERIC_FAILURE.to_string()));
    assert_eq!(*controller.state(), SubmitState::Idle);
    assert!(store.restore().is_some());
}

#[test]
fn resubmitting_after_success_makes_no_second_network_call() {
    let (store, formv, _guard) = seeded_store();
    let mut controller = SubmissionController::new(MockClient::with(Ok(success_response())));

    let first = controller.submit(final_step(), &formv, &store, &mut NoopEffects);
    assert!(matches!(first, SubmitOutcome::Completed(_)));

    let second = controller.submit(final_step(), &formv, &store, &mut NoopEffects);
    assert!(matches!(second, SubmitOutcome::Failed(_)));
    assert_eq!(controller.client().calls.get(), 1);
}

#[test]
fn failed_local_validation_never_touches_the_network() {
    let (store, _formv, _guard) = seeded_store();
    let mut controller = SubmissionController::new(MockClient::with(Ok(success_response())));

    // The contact step has required fields; an empty form cannot pass.
    let outcome = controller.submit(&form::STEPS[0], &FormState::new(), &store, &mut NoopEffects);
    match outcome {
        SubmitOutcome::Rejected(failures) => assert!(!failures.is_empty()),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(controller.client().calls.get(), 0);
    assert_eq!(*controller.state(), SubmitState::Idle);
    assert!(store.restore().is_some());
}

#[test]
fn the_request_body_flattens_answers_and_adds_section_flags() {
    let (store, mut formv, _guard) = seeded_store();
    formv.set_flag("includeAnalysis", true);
    let mut controller = SubmissionController::new(MockClient::with(Ok(success_response())));

    controller.submit(final_step(), &formv, &store, &mut NoopEffects);

    let payloads = controller.client().payloads.borrow();
    let body = payloads[0].as_object().expect("object body");
    assert_eq!(body["client_name"], "Ann");
    assert_eq!(body["question3"], "Q3");
    assert_eq!(body["includeAnalysis"], true);
    assert_eq!(body["includeConclusion"], false);
}
