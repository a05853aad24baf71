//! partscan - decode DOS/MBR and GPT partition tables from a device or image

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Decode the partition tables of a block device or disk image
#[derive(Parser)]
#[command(name = "partscan", version, about)]
struct Cli {
    /// Block device or disk-image path
    device: PathBuf,

    /// Print the catalog as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let table = partscan_tables::analyze(&cli.device)
        .with_context(|| format!("analyzing {}", cli.device.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("{}", table);
    }

    Ok(())
}
