//! CLI argument parsing
//!
//! Defines command-line interface using clap. Anything not given as a
//! flag falls back to `BILLING_PROBE_*` environment variables and
//! then to interactive prompts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ProbeOptions;

/// Chat-completion billing comparison probe
#[derive(Parser, Debug)]
#[command(name = "billing-probe")]
#[command(author = "hephaex@gmail.com")]
#[command(version = "0.1.0")]
#[command(about = "Probe whether correlation-id reuse reduces billed chat requests")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full traditional-vs-agent comparison
    Compare(CompareArgs),

    /// Run a single batch in one mode
    Batch(BatchArgs),

    /// Print one usage snapshot
    Usage(UsageArgs),

    /// Display a saved results file
    Results(ResultsArgs),
}

/// Connection flags shared by probing commands
#[derive(Parser, Debug)]
pub struct ConnectionArgs {
    /// Base URL of the proxy or vendor endpoint
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Bearer token (prompted for if absent)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Endpoint flavor (openai, vendor)
    #[arg(short, long)]
    pub flavor: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Calls per batch
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Delay between calls in seconds
    #[arg(long)]
    pub call_delay: Option<u64>,

    /// Settle wait before each usage snapshot in seconds
    #[arg(long)]
    pub settle: Option<u64>,

    /// Results file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip operator confirmation pauses
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Batch mode (traditional, agent)
    #[arg(long, default_value = "traditional")]
    pub mode: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Calls in the batch
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Delay between calls in seconds
    #[arg(long)]
    pub call_delay: Option<u64>,

    /// Settle wait before the usage snapshot in seconds
    #[arg(long)]
    pub settle: Option<u64>,

    /// Results file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip operator confirmation pauses
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the usage command
#[derive(Parser, Debug)]
pub struct UsageArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Skip interactive prompts
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Results file to read
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Output format (table, json, json-pretty, summary)
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Export per-call outcomes as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,
}

impl CompareArgs {
    pub fn options(&self) -> ProbeOptions {
        ProbeOptions {
            base_url: self.connection.base_url.clone(),
            token: self.connection.token.clone(),
            flavor: self.connection.flavor.clone(),
            model: self.connection.model.clone(),
            iterations: self.iterations,
            call_delay_secs: self.call_delay,
            settle_secs: self.settle,
            output: self.output.clone(),
            yes: self.yes,
        }
    }
}

impl BatchArgs {
    pub fn options(&self) -> ProbeOptions {
        ProbeOptions {
            base_url: self.connection.base_url.clone(),
            token: self.connection.token.clone(),
            flavor: self.connection.flavor.clone(),
            model: self.connection.model.clone(),
            iterations: self.iterations,
            call_delay_secs: self.call_delay,
            settle_secs: self.settle,
            output: self.output.clone(),
            yes: self.yes,
        }
    }
}

impl UsageArgs {
    pub fn options(&self) -> ProbeOptions {
        ProbeOptions {
            base_url: self.connection.base_url.clone(),
            token: self.connection.token.clone(),
            flavor: self.connection.flavor.clone(),
            model: self.connection.model.clone(),
            yes: self.yes,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_args() {
        let args = Args::parse_from([
            "billing-probe",
            "compare",
            "--token",
            "user::jwt",
            "--iterations",
            "5",
            "--yes",
        ]);
        match args.command {
            Command::Compare(compare) => {
                assert_eq!(compare.connection.token.as_deref(), Some("user::jwt"));
                assert_eq!(compare.iterations, Some(5));
                assert!(compare.yes);
            }
            _ => panic!("Expected Compare command"),
        }
    }

    #[test]
    fn test_batch_mode_default() {
        let args = Args::parse_from(["billing-probe", "batch"]);
        match args.command {
            Command::Batch(batch) => {
                assert_eq!(batch.mode, "traditional");
                assert!(batch.iterations.is_none());
            }
            _ => panic!("Expected Batch command"),
        }
    }

    #[test]
    fn test_results_args() {
        let args = Args::parse_from(["billing-probe", "results", "--format", "json"]);
        match args.command {
            Command::Results(results) => {
                assert_eq!(results.format, "json");
                assert!(results.file.is_none());
            }
            _ => panic!("Expected Results command"),
        }
    }
}
