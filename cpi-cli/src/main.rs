//! cpi - command-line front end for the coolant pump interlock.
//!
//! Thin adapter around the `cpi-engine` and `cpi-trace` libraries:
//! evaluates JSON payloads against the interlock, drives the
//! traceability reporting pipeline, and writes starter registry files.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use cpi_engine::{InterlockEngine, SafetyConfig, SensorReading};
use cpi_trace::pipeline::{run_pipeline, PipelineOptions};
use cpi_trace::registry::RequirementRegistry;

mod payload;

use payload::{EvaluationRequest, EvaluationResponse};

/// Coolant pump interlock: safety evaluation and validation reporting.
#[derive(Parser)]
#[command(name = "cpi", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one JSON payload (stdin in, stdout out)
    Evaluate {
        /// Read the payload from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Safety configuration override (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Build traceability artifacts from recorded test results
    Trace {
        /// Requirement registry file (TOML); built-in catalogue when omitted
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Directory of JUnit/TRX result files; demonstration evidence when omitted
        #[arg(long)]
        results: Option<PathBuf>,
        /// Base directory for per-run artifact directories
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,
    },
    /// Write a starter requirement registry file
    InitRegistry {
        /// Destination path
        #[arg(long, default_value = "requirements.toml")]
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".bright_red());
            process::exit(1);
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Evaluate { input, config } => cmd_evaluate(input.as_deref(), config.as_deref()),
        Commands::Trace {
            registry,
            results,
            artifacts,
        } => cmd_trace(registry, results, artifacts),
        Commands::InitRegistry { path } => cmd_init_registry(&path),
    }
}

fn load_config(path: Option<&Path>) -> Result<SafetyConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))
        },
        None => Ok(SafetyConfig::default()),
    }
}

fn cmd_evaluate(input: Option<&Path>, config: Option<&Path>) -> Result<i32> {
    let payload = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read payload from stdin")?;
            buffer
        },
    };

    let request: EvaluationRequest =
        serde_json::from_str(&payload).context("malformed evaluation payload")?;

    let engine = InterlockEngine::new(load_config(config)?);
    let command = request.command.map(Into::into);
    let result = engine.evaluate(
        SensorReading {
            temperature_c: request.temperature_c,
            pressure_bar: request.pressure_bar,
        },
        command.as_ref(),
    );

    let response = EvaluationResponse::from(result);
    println!(
        "{}",
        serde_json::to_string(&response).context("failed to serialize result")?
    );
    Ok(0)
}

fn cmd_trace(
    registry: Option<PathBuf>,
    results: Option<PathBuf>,
    artifacts: PathBuf,
) -> Result<i32> {
    let outcome = run_pipeline(&PipelineOptions {
        registry_path: registry,
        evidence_root: results,
        artifact_base: artifacts,
    })
    .context("reporting pipeline failed")?;

    let totals = &outcome.summary.totals;
    println!(
        "Requirements: {}, Covered: {}, Passed: {}, Failed: {}, Unknown: {}",
        totals.required, totals.covered, totals.passed, totals.failed, totals.unknown
    );
    println!(
        "Evidence records: {} -> {}",
        outcome.evidence_count,
        outcome.artifact_dir.display()
    );

    if outcome.summary.is_validated() {
        println!("Overall: {}", "VALIDATED".bright_green());
        Ok(0)
    } else {
        println!("Overall: {}", "NOT VALIDATED".bright_red());
        Ok(1)
    }
}

fn cmd_init_registry(path: &Path) -> Result<i32> {
    RequirementRegistry::init_sample(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote starter registry to {}", path.display());
    Ok(0)
}
