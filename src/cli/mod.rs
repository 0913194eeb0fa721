//! Interactive terminal front end for the report wizard.

mod effects;
mod view;

pub use effects::StatusLineEffects;
pub use view::TerminalView;

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::config::ConfigManager;
use crate::errors::Result;
use crate::form::FieldKind;
use crate::storage::{DraftStore, JsonDraftStore};
use crate::submit::http::HttpReportClient;
use crate::submit::{ReportClient, SubmissionController, SubmitOutcome};
use crate::utils;
use crate::wizard::{Panel, WizardController, WizardView};

const DRAFT_DIR: &str = "draft";

/// Where the navigation menu sends the wizard next.
enum NavChoice {
    Next,
    Back,
    Submit,
    Quit,
}

pub fn run_cli() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let client = HttpReportClient::new(&config.service_url)?;

    if let Some(report_id) = lookup_arg(&args) {
        return print_stored_report(&client, &report_id);
    }

    let base = utils::resolve_base_dir(config.data_dir.clone());
    let store = JsonDraftStore::new(base.join(DRAFT_DIR))?;
    run_wizard(&store, client)
}

fn lookup_arg(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--report" {
            return iter.next().cloned();
        }
    }
    None
}

fn print_stored_report(client: &HttpReportClient, report_id: &str) -> Result<()> {
    let report = client.fetch_report(report_id)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_wizard(store: &dyn DraftStore, client: HttpReportClient) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut wizard = WizardController::new(TerminalView::new(), store);
    let mut submission = SubmissionController::new(client);
    let mut effects = StatusLineEffects::new();

    wizard.render();
    loop {
        prompt_step_fields(&theme, &mut wizard)?;
        let choice = prompt_navigation(&theme, wizard.is_last_step(), wizard.position() > 0)?;
        match choice {
            NavChoice::Next => {
                wizard.go_next();
            }
            NavChoice::Back => {
                wizard.go_previous();
            }
            NavChoice::Quit => {
                println!(
                    "{}",
                    "Your answers were saved; run again to resume.".dimmed()
                );
                return Ok(());
            }
            NavChoice::Submit => {
                let step = wizard.active_step();
                let outcome = submission.submit(step, wizard.form(), store, &mut effects);
                match outcome {
                    SubmitOutcome::Completed(report) => {
                        wizard.view_mut().show_panel(Panel::Success {
                            download_url: report.download_url,
                        });
                        return Ok(());
                    }
                    SubmitOutcome::Failed(message) => {
                        wizard.view_mut().show_panel(Panel::Error { message });
                        wizard.render();
                    }
                    SubmitOutcome::Rejected(failures) => {
                        for failure in &failures {
                            if let Some(error) = &failure.error {
                                println!("{} {}", "[!]".yellow(), error);
                            }
                        }
                        wizard.render();
                    }
                }
            }
        }
    }
}

fn prompt_step_fields(
    theme: &ColorfulTheme,
    wizard: &mut WizardController<'_, TerminalView>,
) -> Result<()> {
    let step = wizard.active_step();
    for field in &step.fields {
        match &field.kind {
            FieldKind::Flag => {
                // Sections default to included, matching the service.
                let default = if wizard.form().contains(field.key) {
                    wizard.form().flag(field.key)
                } else {
                    true
                };
                let value = Confirm::with_theme(theme)
                    .with_prompt(field.label)
                    .default(default)
                    .interact()?;
                wizard.set_flag(field.key, value);
            }
            FieldKind::Choice(options) => {
                // A saved draft restores radio-style: the stored value
                // selects the matching option, unknown values fall back to
                // the first.
                let default_index = wizard
                    .form()
                    .text(field.key)
                    .and_then(|value| options.iter().position(|option| *option == value))
                    .unwrap_or(0);
                let index = Select::with_theme(theme)
                    .with_prompt(field.label)
                    .items(options)
                    .default(default_index)
                    .interact()?;
                wizard.set_text(field.key, options[index]);
            }
            FieldKind::Text | FieldKind::Email | FieldKind::MultiLine => {
                let current = wizard
                    .form()
                    .text(field.key)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string);
                let value = match current {
                    Some(existing) => Input::<String>::with_theme(theme)
                        .with_prompt(field.label)
                        .default(existing)
                        .interact_text()?,
                    None => Input::<String>::with_theme(theme)
                        .with_prompt(field.label)
                        .allow_empty(true)
                        .interact_text()?,
                };
                wizard.set_text(field.key, value.trim());
            }
        }
    }
    Ok(())
}

fn prompt_navigation(
    theme: &ColorfulTheme,
    is_last: bool,
    can_go_back: bool,
) -> Result<NavChoice> {
    let mut items: Vec<&str> = Vec::new();
    items.push(if is_last { "Submit" } else { "Next" });
    if can_go_back {
        items.push("Back");
    }
    items.push("Save & quit");

    let index = Select::with_theme(theme)
        .with_prompt("Where to?")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(match items[index] {
        "Next" => NavChoice::Next,
        "Submit" => NavChoice::Submit,
        "Back" => NavChoice::Back,
        _ => NavChoice::Quit,
    })
}
