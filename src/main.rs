use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use piccull::app::PicCullApp;
use piccull::image_utils::check_decoders;

/// Folders are chosen from inside the application; there are no options
/// beyond --help and --version.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Review a folder of images and move rejects to .deleted, with undo"
)]
struct Args {}

fn main() -> Result<()> {
    let _args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("piccull=info")),
        )
        .init();

    check_decoders()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PicCull")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    info!("starting PicCull");
    eframe::run_native(
        "PicCull",
        native_options,
        Box::new(|cc| Ok(Box::new(PicCullApp::new(cc)))),
    )
    .map_err(|err| anyhow!("Unable to open the PicCull window: {err}"))?;

    Ok(())
}
