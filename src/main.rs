mod app;
mod catalog;
mod config;
mod geometry;
mod graph;
mod inspect;
mod interaction;
mod loader;
mod scene;
mod simulation;

use anyhow::{Result, anyhow};
use clap::Parser;
use log::info;

use config::{Args, ViewerConfig};

const SIDE_PANEL_WIDTH: f32 = 280.0;
const CHROME_HEIGHT: f32 = 60.0;

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let config = ViewerConfig::from_args(&args)?;
    info!(
        "canvas {}x{}, data root {}",
        config.canvas.x,
        config.canvas.y,
        config.data_dir.display()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([
            config.canvas.x + SIDE_PANEL_WIDTH,
            config.canvas.y + CHROME_HEIGHT,
        ]),
        ..Default::default()
    };

    eframe::run_native(
        "relmap",
        options,
        Box::new(move |cc| Ok(Box::new(app::RelmapApp::new(cc, config)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
