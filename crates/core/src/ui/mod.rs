//! Desktop user interface for career-shot.
//!
//! This module provides the single-window application that drives the
//! upload -> generate -> edit -> reset flow against the Gemini image API.
//!
//! # Architecture
//!
//! The UI is a thin shell over [`crate::state::AppState`]: every frame it
//! asks the state machine which screen is visible and renders it. Remote
//! calls run on background threads and report back through a channel, so the
//! UI thread never blocks.
//!
//! - [`app`]: the `eframe::App` implementation and screen rendering
//! - [`widgets`]: texture decoding and drawing helpers

mod app;
mod widgets;

pub use app::CareerShotApp;

use eframe::egui;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Launches the application window and blocks until it closes.
///
/// # Errors
///
/// Returns [`AppError::Ui`] if the native window cannot be created.
pub fn run_app(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Career Shot"),
        ..Default::default()
    };

    eframe::run_native(
        "Career Shot",
        options,
        Box::new(move |_cc| Ok(Box::new(CareerShotApp::new(config)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))?;

    Ok(())
}
