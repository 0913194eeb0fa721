//! Blocking HTTP client for the report service.
//!
//! The wizard runs on a single UI thread and allows one request in flight,
//! so the blocking `reqwest` client is the right shape here.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;

use crate::errors::{Result, WizardError};

use super::{ReportClient, ReportResponse};

const GENERATE_PATH: &str = "generate_report";
const REPORT_PATH: &str = "get_report";
// Report generation can legitimately take a while on the service side.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct HttpReportClient {
    base: Url,
    client: Client,
}

impl HttpReportClient {
    /// Builds a client for the given service origin, e.g.
    /// `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|err| {
            WizardError::Config(format!("invalid service URL `{base_url}`: {err}"))
        })?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| WizardError::Config("service URL cannot be a base".into()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }
}

impl ReportClient for HttpReportClient {
    fn generate(&self, payload: &Value) -> Result<ReportResponse> {
        let url = self.endpoint(&[GENERATE_PATH])?;
        tracing::debug!(%url, "POST report request");
        let response = self.client.post(url).json(payload).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json()?)
        } else {
            // The service wraps errors in the same JSON envelope; prefer
            // its message over the bare status code when it parses.
            match response.json::<ReportResponse>() {
                Ok(body) if !body.status.is_empty() => Ok(body),
                _ => Err(WizardError::Protocol(format!(
                    "report service returned HTTP {status}"
                ))),
            }
        }
    }

    fn resolve_url(&self, path: &str) -> String {
        match self.base.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        }
    }

    fn fetch_report(&self, report_id: &str) -> Result<Value> {
        let url = self.endpoint(&[REPORT_PATH, report_id])?;
        tracing::debug!(%url, "GET stored report");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(WizardError::Protocol(format!(
                "report lookup failed with HTTP {status}"
            )));
        }
        Ok(response.json()?)
    }
}
