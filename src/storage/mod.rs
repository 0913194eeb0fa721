//! Durable draft persistence for in-progress wizard sessions.

pub mod json_backend;

use chrono::{DateTime, Utc};

use crate::errors::WizardError;
use crate::form::FormState;

pub type Result<T> = std::result::Result<T, WizardError>;

/// A restored in-progress session: the answers plus the step that was
/// active when the draft was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub form: FormState,
    pub position: usize,
    pub saved_at: DateTime<Utc>,
}

/// Abstraction over draft persistence. At most one draft exists per store:
/// `save` overwrites it after every user-visible mutation, `clear` removes
/// it after a successful submission.
pub trait DraftStore {
    fn save(&self, form: &FormState, position: usize) -> Result<()>;

    /// Returns the persisted draft, or `None` when no draft exists or the
    /// stored data cannot be read. Restoration is never fatal; corrupt data
    /// is skipped with a warning.
    fn restore(&self) -> Option<Draft>;

    fn clear(&self) -> Result<()>;
}

pub use json_backend::{JsonDraftStore, DRAFT_SCHEMA_VERSION};
