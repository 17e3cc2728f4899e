//! ragaid - identify the raga of recorded performances
//!
//! Usage:
//!   ragaid <audio>...                          # uses config.toml if present
//!   ragaid --tonic 146.83 <audio>...           # fixed tonic instead of the median pitch
//!   ragaid --catalogue ragas.json <audio>...   # custom scale catalogue

use anyhow::{Context, Result};
use clap::Parser;
use raga_cli::output::{print_json_results, FileReport, Outcome};
use raga_core::{Analyzer, Catalogue, RagaConfig, Tonic};
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ragaid")]
#[command(about = "Rank candidate ragas for recorded melodies", long_about = None)]
struct Args {
    /// Audio files to analyze (wav, mp3, flac, ogg, m4a, ...)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (TOML). Defaults to ./config.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raga catalogue (JSON), overrides the config file
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Tonic (Sa) in Hz. Derived from the median pitch when omitted
    #[arg(short, long)]
    tonic: Option<Tonic>,

    /// Include the folded cent trajectory in each report
    #[arg(long)]
    trajectory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Default: no logs (clean JSON output for parsing)
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    // a bad tonic was already rejected by argument parsing, before any audio
    let tonic = args.tonic;
    if let Some(tonic) = tonic {
        log::info!("Tonic override: {}", tonic);
    }

    let config = RagaConfig::load_or_default(args.config.as_deref())?;
    let catalogue_path = args.catalogue.unwrap_or(config.catalogue.path);
    let catalogue = Catalogue::load_or_empty(&catalogue_path);
    log::info!(
        "Catalogue {}: {} ragas",
        catalogue_path.display(),
        catalogue.len()
    );

    let analyzer = Analyzer::new(config.analysis).context("Invalid analysis configuration")?;

    let start = std::time::Instant::now();
    let results: Vec<FileReport> = args
        .inputs
        .par_iter()
        .map(|path| {
            let outcome = match analyzer.analyze_file(path, tonic, &catalogue) {
                Ok(analysis) => Outcome::Report(analysis.into_report(args.trajectory)),
                Err(e) => {
                    log::warn!("Failed to analyze {}: {}", path.display(), e);
                    Outcome::Error(e.to_string())
                }
            };
            FileReport {
                path: path.display().to_string(),
                outcome,
            }
        })
        .collect();

    log::info!(
        "Analyzed {} files in {:.2}s",
        results.len(),
        start.elapsed().as_secs_f64()
    );

    print_json_results(&results);

    if results.iter().all(FileReport::is_error) {
        anyhow::bail!("No input could be analyzed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tonic_parsed_from_args() {
        let args = Args::try_parse_from(["ragaid", "--tonic", " 146.83 ", "a.wav"]).unwrap();
        assert_eq!(args.tonic.map(Tonic::hz), Some(146.83));
        assert_eq!(args.inputs, vec![PathBuf::from("a.wav")]);
    }

    #[test]
    fn test_bad_tonic_rejected_by_parser() {
        for bad in ["abc", "0", "-220"] {
            assert!(Args::try_parse_from(["ragaid", "-t", bad, "a.wav"]).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_inputs_required() {
        assert!(Args::try_parse_from(["ragaid"]).is_err());
    }
}
