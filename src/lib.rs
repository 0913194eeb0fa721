#![doc(test(attr(deny(warnings))))]

//! Report Wizard collects business-profile answers through a multi-step
//! form, keeps a resumable draft on disk, and submits the finished answers
//! to a report service that renders a downloadable PDF.

pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod storage;
pub mod submit;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Report Wizard tracing initialized.");
    });
}
