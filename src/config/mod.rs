//! Persistent CLI configuration with environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::{self, ensure_dir, write_atomic};

const CONFIG_FILE: &str = "config.json";
const URL_ENV: &str = "REPORT_WIZARD_URL";
const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    pub service_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            data_dir: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(utils::resolve_base_dir(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Loads the stored configuration, falling back to defaults when the
    /// file does not exist, then applies environment overrides.
    pub fn load(&self) -> Result<WizardConfig> {
        let mut config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            WizardConfig::default()
        };
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                config.service_url = url;
            }
        }
        Ok(config)
    }

    pub fn save(&self, config: &WizardConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
