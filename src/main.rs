use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use bitflip_qec::{BitFlipCorrector, BitFlipError, Config, CorrectionReport, Terminal};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Qasm,
}

#[derive(Parser)]
#[command(name = "bitflip")]
#[command(about = "Three-qubit bit-flip error correction on a state-vector simulator")]
struct Args {
    /// Data qubit (0, 1 or 2) that receives the bit flip
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    qubit: i64,

    /// Number of read-outs for the histogram
    #[arg(short, long)]
    shots: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with `shots` and `seed`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Logging level, `RUST_LOG` takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            let mut term = Terminal::new(io::stderr());
            if term.error(&message).is_err() {
                eprintln!("Error: {message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    }
    .with_overrides(args.shots, args.seed)?;

    let corrector = BitFlipCorrector::new(config);
    let correction = match corrector.correct(args.qubit) {
        Ok(correction) => correction,
        Err(e @ BitFlipError::InvalidQubitIndex(_)) => {
            return Err(e).context("Nothing was evaluated");
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        error_qubit = correction.error_qubit.index(),
        shots = correction.outcome.shots(),
        "Correction finished"
    );

    match args.format {
        Format::Text => {
            let mut term = Terminal::new(io::stdout().lock());
            term.correction(&correction)
                .context("Failed to write to stdout")?;
        }
        Format::Json => {
            let report = CorrectionReport::from(&correction);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Qasm => print!("{}", correction.circuit.to_qasm()),
    }

    Ok(())
}
