//! Command-line report over one options snapshot.

use anyhow::{Context, Result};
use clap::Parser;
use optlens_core::Config;
use optlens_report::{render, RenderOptions, Snapshot};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "optlens")]
#[command(about = "Options snapshot report: chain, greeks and unusual flow", long_about = None)]
struct Cli {
    /// Directory holding CADENA.csv, Griegas.csv and Inusual.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Highlighted trades to list
    #[arg(short, long, default_value = "10")]
    top: usize,

    /// Print the snapshot summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optlens=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }
    info!(data_dir = %config.data.data_dir.display(), "running snapshot");

    let snapshot = Snapshot::run(&config).context("snapshot failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.summary())?);
    } else {
        print!("{}", render(&snapshot, RenderOptions { top: cli.top }));
    }
    Ok(())
}
