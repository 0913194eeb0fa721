use colored::Colorize;

use crate::submit::{ReportReady, TransitionEffects};

/// Prints a status line on each submission transition. Stands in for the
/// original fade animations; the state machine never waits on it.
#[derive(Debug, Default)]
pub struct StatusLineEffects;

impl StatusLineEffects {
    pub fn new() -> Self {
        Self
    }
}

impl TransitionEffects for StatusLineEffects {
    fn entered_submitting(&mut self) {
        println!(
            "{}",
            "Generating your report, this can take a minute...".cyan()
        );
    }

    fn entered_success(&mut self, report: &ReportReady) {
        println!("{}", "SUCCESS: [✓] Report generated.".green());
        if let Some(id) = &report.report_id {
            println!("Report ID: {id}");
        }
        if let Some(doc_url) = &report.doc_url {
            println!("Document: {doc_url}");
        }
    }

    fn entered_error(&mut self, message: &str) {
        println!("{}", format!("ERROR: [x] {message}").red());
    }
}
