use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::FormState;
use crate::utils::{ensure_dir, write_atomic};

use super::{Draft, DraftStore, Result};

const FORM_STATE_FILE: &str = "formState.json";
const CURRENT_STEP_FILE: &str = "currentStep";

pub const DRAFT_SCHEMA_VERSION: u32 = 1;

/// File-backed draft store. The draft lives under one directory as two
/// durable keys: a versioned form snapshot and the wizard position as a
/// decimal string.
#[derive(Clone)]
pub struct JsonDraftStore {
    dir: PathBuf,
    form_file: PathBuf,
    step_file: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct DraftSnapshot {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    form: FormState,
}

impl JsonDraftStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        ensure_dir(&dir)?;
        let form_file = dir.join(FORM_STATE_FILE);
        let step_file = dir.join(CURRENT_STEP_FILE);
        Ok(Self {
            dir,
            form_file,
            step_file,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.dir
    }

    fn read_snapshot(&self) -> Option<DraftSnapshot> {
        let data = fs::read_to_string(&self.form_file).ok()?;
        match serde_json::from_str::<DraftSnapshot>(&data) {
            Ok(snapshot) if snapshot.schema_version <= DRAFT_SCHEMA_VERSION => Some(snapshot),
            Ok(snapshot) => {
                tracing::warn!(
                    version = snapshot.schema_version,
                    "draft was written by a newer schema, skipping restore"
                );
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "draft form state is corrupt, skipping restore");
                None
            }
        }
    }

    fn read_position(&self) -> Option<usize> {
        let data = fs::read_to_string(&self.step_file).ok()?;
        match data.trim().parse::<usize>() {
            Ok(position) => Some(position),
            Err(_) => {
                tracing::warn!(raw = %data.trim(), "draft step index is not a number, skipping restore");
                None
            }
        }
    }
}

impl DraftStore for JsonDraftStore {
    fn save(&self, form: &FormState, position: usize) -> Result<()> {
        let snapshot = DraftSnapshot {
            schema_version: DRAFT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            form: form.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_atomic(&self.form_file, &json)?;
        write_atomic(&self.step_file, &position.to_string())?;
        Ok(())
    }

    fn restore(&self) -> Option<Draft> {
        let snapshot = self.read_snapshot()?;
        let position = self.read_position()?;
        Some(Draft {
            form: snapshot.form,
            position,
            saved_at: snapshot.saved_at,
        })
    }

    fn clear(&self) -> Result<()> {
        remove_if_present(&self.form_file)?;
        remove_if_present(&self.step_file)?;
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
