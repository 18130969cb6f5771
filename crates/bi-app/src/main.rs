//! Main application entry point

use std::path::PathBuf;
use anyhow::{Context as _, Result};
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bi_core::AppSettings;

mod app;
mod builder;

use app::InsightBoardApp;

/// Settings file, looked up in the working directory
const SETTINGS_FILE: &str = "insight-board.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Insight Board");

    let settings_path = PathBuf::from(SETTINGS_FILE);
    let settings = AppSettings::load(&settings_path).unwrap_or_else(|e| {
        warn!("Ignoring unreadable {}: {}", settings_path.display(), e);
        AppSettings::default()
    });
    let dark_mode = settings.dark_mode;

    let initial_csv = std::env::args().nth(1).map(PathBuf::from);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: if dark_mode { eframe::Theme::Dark } else { eframe::Theme::Light },
        ..Default::default()
    };

    eframe::run_native(
        "Insight Board",
        options,
        Box::new(move |cc| {
            let mut app = InsightBoardApp::new(cc, runtime, settings, settings_path);
            if let Some(path) = initial_csv {
                app.open_csv_file(path);
            }
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
