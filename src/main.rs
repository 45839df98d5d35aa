mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::AwardLensApp;
use eframe::egui;
use state::AppState;

/// Dataset loaded at startup when no path is given on the command line.
const DEFAULT_DATASET: &str = "dei_contracts_master.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // The dataset is loaded once, before any rendering. A missing or
    // unreadable file is fatal here; File → Open failures later are not.
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));
    let dataset = data::loader::load_file(&path)
        .with_context(|| format!("loading contract data from {}", path.display()))?;
    log::info!(
        "Loaded {} contracts ({} agencies, {} themes, {} rows quarantined)",
        dataset.len(),
        dataset.agencies.len(),
        dataset.themes.len(),
        dataset.skipped_rows
    );

    let mut state = AppState::default();
    state.set_dataset(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Award Lens – Federal Contracts Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(AwardLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
