//! Environment variable configuration
//!
//! Provides environment variable overrides for probe configuration.

#![allow(dead_code)]

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "BILLING_PROBE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from BILLING_PROBE_BASE_URL
    pub base_url: Option<String>,
    /// Bearer token from BILLING_PROBE_TOKEN
    pub token: Option<String>,
    /// Endpoint flavor from BILLING_PROBE_FLAVOR
    pub flavor: Option<String>,
    /// Model from BILLING_PROBE_MODEL
    pub model: Option<String>,
    /// Iterations from BILLING_PROBE_ITERATIONS
    pub iterations: Option<usize>,
    /// Inter-call delay from BILLING_PROBE_CALL_DELAY
    pub call_delay_secs: Option<u64>,
    /// Settle wait from BILLING_PROBE_SETTLE
    pub settle_secs: Option<u64>,
    /// Results file from BILLING_PROBE_OUTPUT
    pub output: Option<String>,
    /// Skip operator confirmations from BILLING_PROBE_YES
    pub yes: Option<bool>,
    /// Verbose from BILLING_PROBE_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("BASE_URL"),
            token: get_env("TOKEN"),
            flavor: get_env("FLAVOR"),
            model: get_env("MODEL"),
            iterations: get_env_parse("ITERATIONS"),
            call_delay_secs: get_env_parse("CALL_DELAY"),
            settle_secs: get_env_parse("SETTLE"),
            output: get_env("OUTPUT"),
            yes: get_env_bool("YES"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.token.is_some()
            || self.flavor.is_some()
            || self.model.is_some()
            || self.iterations.is_some()
            || self.call_delay_secs.is_some()
            || self.settle_secs.is_some()
            || self.output.is_some()
            || self.yes.is_some()
            || self.verbose.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| parse_bool(&v))
}

fn parse_bool(v: &str) -> bool {
    matches!(
        v.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn test_env_override_round_trip() {
        env::set_var("BILLING_PROBE_ITERATIONS", "7");
        let config = EnvConfig::load();
        assert_eq!(config.iterations, Some(7));
        assert!(config.has_any());
        env::remove_var("BILLING_PROBE_ITERATIONS");
    }
}
