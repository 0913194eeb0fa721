use colored::Colorize;

use crate::form::{self, StepSpec};
use crate::wizard::{Panel, WizardView};

const PROGRESS_WIDTH: usize = 30;

/// Renders wizard steps as styled terminal sections.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }
}

impl WizardView for TerminalView {
    fn set_active_step(&mut self, position: usize, step: &StepSpec) {
        let title = format!(
            "Step {} of {}: {}",
            position + 1,
            form::step_count(),
            step.title
        );
        println!();
        println!("{}", title.bold());
        println!("{}", "-".repeat(title.chars().count()).dimmed());
    }

    fn set_progress(&mut self, percent: u8) {
        let filled = (percent as usize * PROGRESS_WIDTH) / 100;
        let bar = format!(
            "[{}{}] {}%",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            percent
        );
        println!("{}", bar.cyan());
    }

    fn show_summary(&mut self, entries: &[(String, String)]) {
        println!("{}", "Review your answers".bold());
        for (label, answer) in entries {
            println!("  {}: {}", label.bold(), answer);
        }
        println!();
    }

    fn show_panel(&mut self, panel: Panel) {
        match panel {
            Panel::Loading => println!("{}", "Generating your report...".cyan()),
            Panel::Success { download_url } => {
                println!("{}", "SUCCESS: [✓] Your report is ready.".green());
                println!("Download: {}", download_url.underline());
            }
            Panel::Error { message } => {
                println!("{} {}", "ERROR: [x]".red(), message);
            }
        }
    }

    fn mark_field(&mut self, key: &str, error: Option<&str>) {
        if let Some(error) = error {
            println!("{} {}", format!("[{key}]").yellow(), error);
        }
    }

    fn alert(&mut self, message: &str) {
        println!("{}", format!("WARNING: [!] {message}").yellow());
    }
}
