mod app;
mod state;
mod ui;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use app::ProductLensApp;
use eframe::egui;
use product_lens::analysis;
use product_lens::config::AnalysisConfig;
use product_lens::data::loader::load_file;
use state::AppState;

/// Ask for the dataset path on stdin.
fn prompt_path() -> Result<PathBuf> {
    print!("Enter the path to the dataset (CSV/JSON): ");
    io::stdout().flush().context("flushing prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading dataset path from stdin")?;
    Ok(PathBuf::from(line.trim()))
}

fn run() -> Result<()> {
    let config = AnalysisConfig::default();
    let path = prompt_path()?;

    let dataset = load_file(&path).with_context(|| format!("loading {}", path.display()))?;
    dataset
        .require_columns(&config.required_columns())
        .with_context(|| format!("validating {}", path.display()))?;

    print!("{}", analysis::report(&dataset, &config)?);

    let state = AppState::new(&dataset, &config).context("preparing figures")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Product Lens",
        options,
        Box::new(|_cc| Ok(Box::new(ProductLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

fn main() -> Result<()> {
    env_logger::init();

    run().inspect_err(|e| log::error!("{e:#}"))
}
