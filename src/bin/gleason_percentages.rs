use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gleason_quant::{run_batch, ColorClassifier, PanelLayout, DEFAULT_REPORT_PATH};

/// Compute Gleason-pattern area percentages from rendered prediction panels.
#[derive(Parser)]
#[command(name = "gleason-percentages")]
#[command(about = "Compute Gleason-pattern area percentages from pred_*.png composites")]
struct Cli {
    /// A pred_*.png composite image, or a directory scanned for them
    input: PathBuf,

    /// CSV report destination
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    let classifier = ColorClassifier::clinical();
    let layout = PanelLayout::default();
    run_batch(&cli.input, &cli.output, &classifier, &layout)?;
    Ok(())
}
