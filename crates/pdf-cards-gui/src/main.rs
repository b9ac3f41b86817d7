#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use log::LevelFilter;
use pdf_cards::ViewerConfig;
use std::path::PathBuf;

mod app;
mod logger;
mod views;
mod worker;

#[derive(Parser)]
#[command(name = "pdf-cards", about = "Flash-card viewer for a PDF deck", version)]
struct Cli {
    /// Viewer configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Card deck PDF, overrides the configuration
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Viewed-state file, overrides the configuration
    #[arg(long)]
    state: Option<PathBuf>,

    /// Keep debug messages in the log panel
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = logger::AppLogger::new(500, level);
    logger.clone().init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut config = runtime.block_on(ViewerConfig::load_or_default(cli.config.as_deref()))?;
    if let Some(pdf) = cli.pdf {
        config.pdf_path = pdf;
    }
    if let Some(state) = cli.state {
        config.state_path = state;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("PDF Cards"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "PDF Cards",
        options,
        Box::new(move |cc| Ok(Box::new(app::CardsApp::new(cc, config, logger, handle)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start viewer: {e}"))?;

    Ok(())
}
