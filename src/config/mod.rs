//! Configuration module
//!
//! Resolves probe configuration from CLI flags, environment
//! variables, and interactive prompts, in that order.

#![allow(dead_code)]

mod env;
mod prompt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::{ApiFlavor, ReportConfig};

pub use env::EnvConfig;
pub use prompt::pause;

/// Default base URL for the local proxy
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default model name
pub const DEFAULT_MODEL: &str = "claude-3.5-sonnet";

/// Default calls per batch
pub const DEFAULT_ITERATIONS: usize = 3;

/// Default delay between calls in seconds
pub const DEFAULT_CALL_DELAY_SECS: u64 = 1;

/// Default settle wait before a usage snapshot in seconds
pub const DEFAULT_SETTLE_SECS: u64 = 30;

/// Default results file, overwritten on each run
pub const DEFAULT_RESULTS_FILE: &str = "cursor-agent-test-results.json";

/// Partially-specified options gathered from CLI flags
#[derive(Clone, Debug, Default)]
pub struct ProbeOptions {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub flavor: Option<String>,
    pub model: Option<String>,
    pub iterations: Option<usize>,
    pub call_delay_secs: Option<u64>,
    pub settle_secs: Option<u64>,
    pub output: Option<PathBuf>,
    pub yes: bool,
}

/// Fully-resolved probe configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Base URL of the proxy or vendor endpoint
    pub base_url: String,

    /// Endpoint flavor
    pub flavor: ApiFlavor,

    /// Bearer token; never serialized
    #[serde(skip)]
    pub token: String,

    /// Model name sent on every request
    pub model: String,

    /// Calls per batch
    pub iterations: usize,

    /// Delay between calls in seconds
    pub call_delay_secs: u64,

    /// Settle wait before each post-batch usage snapshot in seconds
    pub settle_secs: u64,

    /// Results file path
    pub output: PathBuf,

    /// Skip operator confirmation pauses
    pub assume_yes: bool,
}

impl ProbeConfig {
    /// Resolve configuration without touching stdin. Missing values
    /// take defaults; a missing token is fatal.
    pub fn resolve_unattended(opts: ProbeOptions, env: EnvConfig) -> Result<Self> {
        let mut merged = Merged::from(opts, env);

        let token = match merged.token.take() {
            Some(token) => token,
            None => bail!("A bearer token is required (--token or BILLING_PROBE_TOKEN)"),
        };

        Self::build(merged, token)
    }

    /// Resolve configuration, prompting the operator for anything
    /// still missing after flags and environment.
    pub fn resolve_interactive(opts: ProbeOptions, env: EnvConfig) -> Result<Self> {
        let mut merged = Merged::from(opts, env);

        if merged.base_url.is_none() {
            merged.base_url = Some(prompt::prompt_with_default("Base URL", DEFAULT_BASE_URL)?);
        }
        if merged.iterations.is_none() {
            let raw = prompt::prompt_with_default(
                "Iterations per batch",
                &DEFAULT_ITERATIONS.to_string(),
            )?;
            merged.iterations = Some(raw.parse().unwrap_or(DEFAULT_ITERATIONS));
        }

        let token = match merged.token.take() {
            Some(token) => token,
            None => prompt::prompt_required("Bearer token")?,
        };

        Self::build(merged, token)
    }

    fn build(merged: Merged, token: String) -> Result<Self> {
        if token.trim().is_empty() {
            bail!("A bearer token is required");
        }

        let flavor = match merged.flavor {
            Some(name) => match ApiFlavor::from_str(&name) {
                Some(flavor) => flavor,
                None => bail!("Unknown endpoint flavor: {name}"),
            },
            None => ApiFlavor::OpenAi,
        };

        Ok(Self {
            base_url: merged
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            flavor,
            token: token.trim().to_string(),
            model: merged.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            iterations: merged.iterations.unwrap_or(DEFAULT_ITERATIONS),
            call_delay_secs: merged.call_delay_secs.unwrap_or(DEFAULT_CALL_DELAY_SECS),
            settle_secs: merged.settle_secs.unwrap_or(DEFAULT_SETTLE_SECS),
            output: merged
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FILE)),
            assume_yes: merged.yes,
        })
    }

    /// Non-secret echo stored in the report
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            base_url: self.base_url.clone(),
            flavor: self.flavor,
            model: self.model.clone(),
            iterations: self.iterations,
            call_delay_secs: self.call_delay_secs,
            settle_secs: self.settle_secs,
        }
    }
}

/// Flags merged over environment, prompts not yet applied
#[derive(Clone, Debug, Default)]
struct Merged {
    base_url: Option<String>,
    token: Option<String>,
    flavor: Option<String>,
    model: Option<String>,
    iterations: Option<usize>,
    call_delay_secs: Option<u64>,
    settle_secs: Option<u64>,
    output: Option<PathBuf>,
    yes: bool,
}

impl Merged {
    fn from(opts: ProbeOptions, env: EnvConfig) -> Self {
        Self {
            base_url: opts.base_url.or(env.base_url),
            token: opts.token.or(env.token),
            flavor: opts.flavor.or(env.flavor),
            model: opts.model.or(env.model),
            iterations: opts.iterations.or(env.iterations),
            call_delay_secs: opts.call_delay_secs.or(env.call_delay_secs),
            settle_secs: opts.settle_secs.or(env.settle_secs),
            output: opts.output.or(env.output.map(PathBuf::from)),
            yes: opts.yes || env.yes.unwrap_or(false),
        }
    }
}
