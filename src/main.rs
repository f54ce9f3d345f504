use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use facefind::{AppConfig, HaarCascade};

#[derive(Parser)]
#[command(name = "facefind")]
#[command(about = "Load an image and outline the faces in it")]
struct Cli {
    /// Haar cascade XML file (default: haarcascade_frontalface_default.xml
    /// from the working directory, ./data, or the OpenCV install)
    #[arg(long, value_name = "FILE")]
    cascade: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let _logger = facefind::logging::setup_logging(args.verbose)?;

    let config = AppConfig::resolve(args.cascade, args.verbose)?;
    let cascade = HaarCascade::load(&config.cascade_path)
        .with_context(|| format!("Failed to load cascade {}", config.cascade_path.display()))?;

    run(config, cascade)
}

#[cfg(feature = "gui")]
fn run(config: AppConfig, cascade: HaarCascade) -> anyhow::Result<()> {
    facefind::gui::run(config, cascade)
}

#[cfg(not(feature = "gui"))]
fn run(_config: AppConfig, _cascade: HaarCascade) -> anyhow::Result<()> {
    anyhow::bail!("facefind was built without the `gui` feature")
}
