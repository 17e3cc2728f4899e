//! ragaserve - HTTP raga identification service
//!
//! Usage:
//!   ragaserve [--config <path>] [--catalogue <path>] [--port <n>]
//!
//!   curl -F 'audio_file=@song.mp3' -F 'tonic_hz=146.83' http://localhost:8080/analyze

use anyhow::Result;
use clap::Parser;
use raga_cli::server::{run_server, AppState};
use raga_core::{Analyzer, CatalogueStore, RagaConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "ragaserve")]
#[command(about = "Serve raga identification over HTTP", long_about = None)]
struct Args {
    /// Path to configuration file (TOML). Defaults to ./config.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raga catalogue (JSON), overrides the config file
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Listen port, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = RagaConfig::load_or_default(args.config.as_deref())?;
    let catalogue_path = args.catalogue.unwrap_or(config.catalogue.path);
    let port = args.port.unwrap_or(config.server.port);

    let state = Arc::new(AppState {
        analyzer: Analyzer::new(config.analysis)?,
        catalogue: CatalogueStore::open(&catalogue_path),
        catalogue_path,
    });
    log::info!(
        "Catalogue {}: {} ragas",
        state.catalogue_path.display(),
        state.catalogue.snapshot().len()
    );
    let analysis = state.analyzer.config();
    log::info!(
        "Analysis at {} Hz, frame {} / hop {}, pitch {:.2}-{:.2} Hz, top {}",
        analysis.sample_rate,
        analysis.frame_length,
        analysis.hop_length,
        analysis.fmin_hz,
        analysis.fmax_hz,
        analysis.top_n
    );

    run_server(
        state,
        &config.server.host,
        port,
        config.server.max_upload_mb * 1024 * 1024,
    )
    .await
}
