use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gleason_quant::convert_directory;

/// Normalize raw source images (RGBA, CMYK, grayscale) to RGB PNGs.
#[derive(Parser)]
#[command(name = "convert-to-rgb")]
#[command(about = "Re-encode source images as RGB PNGs and list the results")]
struct Cli {
    /// Directory holding the raw source images
    #[arg(default_value = "images")]
    input: PathBuf,

    /// Output root; converted files land in <OUTPUT>/converted_rgb/
    #[arg(short, long, default_value = "out")]
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
    convert_directory(&cli.input, &cli.output)?;
    Ok(())
}
