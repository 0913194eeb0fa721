//! Wizard state machine: step position, navigation gating, and the view
//! binding that renders it.

pub mod progress;
pub mod summary;

use crate::form::{self, validate_step, FormState, StepSpec, StepValidation};
use crate::storage::DraftStore;

/// Panels the view can reveal outside the step sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Loading,
    Success { download_url: String },
    Error { message: String },
}

/// Capability set the controller needs from a front end. Implementations
/// decide how steps look; the controller only sequences them.
pub trait WizardView {
    /// Marks exactly one step active; all others are implicitly inactive.
    fn set_active_step(&mut self, position: usize, step: &StepSpec);
    fn set_progress(&mut self, percent: u8);
    fn show_summary(&mut self, entries: &[(String, String)]);
    fn show_panel(&mut self, panel: Panel);
    /// Toggles the per-field validity marker; `None` clears it.
    fn mark_field(&mut self, key: &str, error: Option<&str>);
    /// Blocking user-facing notice, e.g. after a failed forward navigation.
    fn alert(&mut self, message: &str);
}

/// Owns the wizard position and the form answers, and drives the step
/// lifecycle through an injected [`WizardView`]. All operations run on the
/// single UI thread in response to discrete user actions.
pub struct WizardController<'a, V: WizardView> {
    position: usize,
    form: FormState,
    view: V,
    store: &'a dyn DraftStore,
}

impl<'a, V: WizardView> WizardController<'a, V> {
    /// Builds a controller at the initial step, restoring a persisted draft
    /// when one exists. Restoration failures fall back to a fresh session
    /// and are never fatal.
    pub fn new(view: V, store: &'a dyn DraftStore) -> Self {
        let mut controller = Self {
            position: 0,
            form: FormState::new(),
            view,
            store,
        };
        if let Some(draft) = store.restore() {
            controller.form = draft.form;
            controller.position = draft.position.min(form::last_step());
            tracing::info!(
                position = controller.position,
                "restored in-progress draft"
            );
        }
        controller
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn active_step(&self) -> &'static StepSpec {
        &form::STEPS[self.position]
    }

    pub fn is_last_step(&self) -> bool {
        self.position == form::last_step()
    }

    /// Records a text answer and mirrors the draft to durable storage.
    pub fn set_text(&mut self, key: &str, value: &str) {
        self.form.set_text(key, value);
        self.persist();
    }

    /// Records a checkbox answer and mirrors the draft to durable storage.
    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.form.set_flag(key, value);
        self.persist();
    }

    /// Advances to the next step if the active step validates. On failure
    /// the position is unchanged and the view receives per-field markers
    /// plus a blocking alert. Returns the (possibly unchanged) position.
    pub fn go_next(&mut self) -> usize {
        let validation = validate_step(self.active_step(), &self.form);
        self.apply_markers(&validation);
        if !validation.all_valid() {
            self.view
                .alert("Please complete all required fields before proceeding.");
            return self.position;
        }
        if self.position < form::last_step() {
            self.position += 1;
            self.persist();
            self.render();
        }
        self.position
    }

    /// Steps backward without any validation gate, clamped at the first
    /// step. Returns the (possibly unchanged) position.
    pub fn go_previous(&mut self) -> usize {
        if self.position > 0 {
            self.position -= 1;
            self.persist();
            self.render();
        }
        self.position
    }

    /// Marks the active step in the view and refreshes the derived
    /// displays. The summary is rebuilt from scratch on the final step.
    pub fn render(&mut self) {
        let step = self.active_step();
        self.view.set_active_step(self.position, step);
        self.view
            .set_progress(progress::percent(self.position, form::step_count()));
        if self.is_last_step() {
            let entries = summary::build(&self.form);
            self.view.show_summary(&entries);
        }
    }

    fn apply_markers(&mut self, validation: &StepValidation) {
        for check in &validation.checks {
            self.view.mark_field(check.key, check.error.as_deref());
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.form, self.position) {
            tracing::warn!(error = %err, "failed to persist draft");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Draft, Result as StorageResult};
    use chrono::Utc;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingView {
        active: Vec<usize>,
        progress: Vec<u8>,
        alerts: Vec<String>,
        summaries: usize,
    }

    impl WizardView for RecordingView {
        fn set_active_step(&mut self, position: usize, _step: &StepSpec) {
            self.active.push(position);
        }
        fn set_progress(&mut self, percent: u8) {
            self.progress.push(percent);
        }
        fn show_summary(&mut self, _entries: &[(String, String)]) {
            self.summaries += 1;
        }
        fn show_panel(&mut self, _panel: Panel) {}
        fn mark_field(&mut self, _key: &str, _error: Option<&str>) {}
        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        draft: RefCell<Option<(FormState, usize)>>,
    }

    impl DraftStore for MemoryStore {
        fn save(&self, form: &FormState, position: usize) -> StorageResult<()> {
            *self.draft.borrow_mut() = Some((form.clone(), position));
            Ok(())
        }

        fn restore(&self) -> Option<Draft> {
            self.draft
                .borrow()
                .clone()
                .map(|(form, position)| Draft {
                    form,
                    position,
                    saved_at: Utc::now(),
                })
        }

        fn clear(&self) -> StorageResult<()> {
            *self.draft.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn forward_navigation_is_blocked_by_invalid_fields() {
        let store = MemoryStore::default();
        let mut wizard = WizardController::new(RecordingView::default(), &store);
        assert_eq!(wizard.go_next(), 0);
        assert_eq!(wizard.view().alerts.len(), 1);
    }

    #[test]
    fn forward_navigation_advances_once_the_step_validates() {
        let store = MemoryStore::default();
        let mut wizard = WizardController::new(RecordingView::default(), &store);
        wizard.set_text("client_name", "Ann");
        wizard.set_text("client_email", "a@b.com");
        assert_eq!(wizard.go_next(), 1);
        assert!(wizard.view().alerts.is_empty());
    }

    #[test]
    fn backward_navigation_needs_no_validation_and_clamps_at_zero() {
        let store = MemoryStore::default();
        let mut wizard = WizardController::new(RecordingView::default(), &store);
        wizard.set_text("client_name", "Ann");
        wizard.set_text("client_email", "a@b.com");
        wizard.go_next();
        // Step 1 is now invalid (industry missing), but back must succeed.
        assert_eq!(wizard.go_previous(), 0);
        assert_eq!(wizard.go_previous(), 0);
    }

    #[test]
    fn restored_position_is_clamped_to_the_step_range() {
        let store = MemoryStore::default();
        let mut form = FormState::new();
        form.set_text("client_name", "Ann");
        store.save(&form, 99).expect("seed draft");
        let wizard = WizardController::new(RecordingView::default(), &store);
        assert_eq!(wizard.position(), form::last_step());
        assert_eq!(wizard.form().text("client_name"), Some("Ann"));
    }

    #[test]
    fn rendering_the_final_step_rebuilds_the_summary() {
        let store = MemoryStore::default();
        let mut form = FormState::new();
        form.set_text("client_name", "Ann");
        store.save(&form, form::last_step()).expect("seed draft");
        let mut wizard = WizardController::new(RecordingView::default(), &store);
        wizard.render();
        wizard.render();
        assert_eq!(wizard.view().summaries, 2);
        assert_eq!(*wizard.view().progress.last().expect("progress"), 100);
    }
}
