//! Billing Probe - Chat-Completion Billing Comparison Tool
//!
//! A CLI tool for observing whether reusing a call-correlation
//! identifier across a batch of chat-completion requests reduces the
//! number of billed requests. Runs a batch of independent calls, then
//! a batch sharing one correlation id, and records raw responses plus
//! before/after usage snapshots for manual comparison against the
//! vendor's billing dashboard.
//!
//! Whether the vendor's billing logic honors shared correlation ids
//! is an unverified assumption this tool exists to test.
//!
//! ## Usage
//!
//! ```bash
//! # Full comparison against a local proxy (prompts for the token)
//! billing-probe compare
//!
//! # Unattended run against the vendor endpoint
//! billing-probe compare --base-url https://api2.cursor.sh \
//!     --flavor vendor --token "$TOKEN" --iterations 3 --yes
//!
//! # One agent-mode batch only
//! billing-probe batch --mode agent --token "$TOKEN" --yes
//!
//! # Check the usage endpoint
//! billing-probe usage --token "$TOKEN" --yes
//!
//! # Re-display the last saved results
//! billing-probe results --format summary
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod harness;
mod http;
mod models;
mod output;
mod results;
mod utils;

use cli::Args;
use config::{EnvConfig, ProbeConfig, ProbeOptions, DEFAULT_RESULTS_FILE};
use harness::ProbeRunner;
use models::TestMode;
use output::{banner, OutputFormat, ResultFormatter};
use results::ResultsStorage;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    match args.command {
        cli::Command::Compare(compare_args) => {
            run_compare(compare_args).await?;
        }
        cli::Command::Batch(batch_args) => {
            run_batch(batch_args).await?;
        }
        cli::Command::Usage(usage_args) => {
            show_usage(usage_args).await?;
        }
        cli::Command::Results(results_args) => {
            show_results(results_args)?;
        }
    }

    Ok(())
}

/// Resolve configuration; unattended runs never touch stdin
fn resolve_config(opts: ProbeOptions) -> Result<ProbeConfig> {
    let env = EnvConfig::load();
    let unattended = opts.yes || env.yes.unwrap_or(false);

    if unattended {
        ProbeConfig::resolve_unattended(opts, env)
    } else {
        ProbeConfig::resolve_interactive(opts, env)
    }
}

async fn run_compare(args: cli::CompareArgs) -> Result<()> {
    let config = resolve_config(args.options())?;

    println!("{}", banner("Billing comparison run"));
    info!(
        "Probing {} ({} flavor, {} calls per batch)",
        config.base_url, config.flavor, config.iterations
    );

    let storage = ResultsStorage::new(config.output.clone());
    let runner = ProbeRunner::new(config)?;

    let report = runner.run_comparison().await?;

    println!(
        "{}",
        ResultFormatter::new(OutputFormat::Table).format_report(&report)
    );

    storage.save(&report)?;
    println!("Full results saved to {}", storage.path().display());

    Ok(())
}

async fn run_batch(args: cli::BatchArgs) -> Result<()> {
    let mode = TestMode::from_str(&args.mode)
        .ok_or_else(|| anyhow::anyhow!("Unknown mode: {}", args.mode))?;

    let config = resolve_config(args.options())?;

    println!("{}", banner(&format!("Single {mode} batch")));
    info!(
        "Probing {} ({} flavor, {} calls)",
        config.base_url, config.flavor, config.iterations
    );

    let storage = ResultsStorage::new(config.output.clone());
    let runner = ProbeRunner::new(config)?;

    let report = runner.run_single(mode).await?;

    println!(
        "{}",
        ResultFormatter::new(OutputFormat::Table).format_report(&report)
    );

    storage.save(&report)?;
    println!("Full results saved to {}", storage.path().display());

    Ok(())
}

async fn show_usage(args: cli::UsageArgs) -> Result<()> {
    let config = resolve_config(args.options())?;
    let runner = ProbeRunner::new(config)?;

    match runner.inspect_usage().await {
        Some(snapshot) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        None => {
            println!("Usage endpoint unavailable; check the vendor dashboard manually.");
        }
    }

    Ok(())
}

fn show_results(args: cli::ResultsArgs) -> Result<()> {
    let path = args
        .file
        .unwrap_or_else(|| DEFAULT_RESULTS_FILE.into());
    let storage = ResultsStorage::new(path);
    let report = storage.load()?;

    let format = OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table);
    println!("{}", ResultFormatter::new(format).format_report(&report));

    if let Some(csv_path) = args.export_csv {
        storage.export_csv(&report, csv_path)?;
    }

    Ok(())
}
