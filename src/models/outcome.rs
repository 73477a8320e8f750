//! Probe result models
//!
//! Defines probe modes, per-call outcomes, batch runs, and the
//! aggregate comparison report.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::chat::ApiFlavor;

/// Documented assumption the probe exists to test. Shared correlation
/// identifiers influencing the vendor's billing logic is an external,
/// unverified hypothesis, not a contract this tool guarantees.
pub const HYPOTHESIS_NOTE: &str = "Correlation-id reuse reducing billed requests is an \
     unverified assumption about the vendor's billing logic; \
     confirm the counts against the billing dashboard manually.";

/// Probe mode for a batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// Independent calls, no correlation metadata
    Traditional,
    /// All calls share one correlation identifier
    Agent,
}

impl TestMode {
    pub fn name(&self) -> &'static str {
        match self {
            TestMode::Traditional => "traditional",
            TestMode::Agent => "agent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "traditional" => Some(TestMode::Traditional),
            "agent" => Some(TestMode::Agent),
            _ => None,
        }
    }

    /// Expected billing behavior under the hypothesis
    pub fn hypothesis(&self) -> &'static str {
        match self {
            TestMode::Traditional => "one billable request per call",
            TestMode::Agent => "all calls in the batch collapse into one billable request",
        }
    }

    /// Billable units this mode should produce for `iterations` calls
    /// if the hypothesis holds
    pub fn expected_billable_units(&self, iterations: usize) -> usize {
        match self {
            TestMode::Traditional => iterations,
            TestMode::Agent => iterations.min(1),
        }
    }

    pub fn all() -> Vec<TestMode> {
        vec![TestMode::Traditional, TestMode::Agent]
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of a single probe call, never mutated after creation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallOutcome {
    /// HTTP status code, absent when the request never got a response
    pub status_code: Option<u16>,

    /// Parsed response body, present iff the call succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    /// Raw error text, present iff the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Round-trip duration in milliseconds
    pub duration_ms: u64,
}

impl CallOutcome {
    pub fn success(status_code: u16, response: Value, duration_ms: u64) -> Self {
        Self {
            status_code: Some(status_code),
            response: Some(response),
            error: None,
            duration_ms,
        }
    }

    pub fn http_failure(status_code: u16, body: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            status_code: Some(status_code),
            response: None,
            error: Some(body.into()),
            duration_ms,
        }
    }

    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self {
            status_code: None,
            response: None,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.response.is_some()
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) if self.is_success() => write!(f, "✓ {code} [{}ms]", self.duration_ms),
            Some(code) => write!(
                f,
                "✗ {code} [{}ms] - {}",
                self.duration_ms,
                self.error.as_deref().unwrap_or("")
            ),
            None => write!(f, "✗ no response - {}", self.error.as_deref().unwrap_or("")),
        }
    }
}

/// One batch of probe calls sharing a mode
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRun {
    pub mode: TestMode,

    /// Requested iteration count
    pub iterations: usize,

    /// Batch-wide correlation identifier, agent mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_call_id: Option<String>,

    /// Per-call outcomes in issue order
    pub outcomes: Vec<CallOutcome>,
}

impl TestRun {
    pub fn traditional(iterations: usize) -> Self {
        Self {
            mode: TestMode::Traditional,
            iterations,
            model_call_id: None,
            outcomes: Vec::with_capacity(iterations),
        }
    }

    pub fn agent(iterations: usize, model_call_id: impl Into<String>) -> Self {
        Self {
            mode: TestMode::Agent,
            iterations,
            model_call_id: Some(model_call_id.into()),
            outcomes: Vec::with_capacity(iterations),
        }
    }

    pub fn push(&mut self, outcome: CallOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.successes()
    }

    /// Billable units expected for this batch under the hypothesis
    pub fn expected_billable_units(&self) -> usize {
        self.mode.expected_billable_units(self.outcomes.len())
    }
}

impl fmt::Display for TestRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} batch: {} calls, {} ok, {} failed",
            self.mode,
            self.outcomes.len(),
            self.successes(),
            self.failures()
        )
    }
}

/// Point-in-time read of account usage, opaque to the probe.
/// `None` is the missing-value sentinel for an absent or failed read.
pub type UsageSnapshot = Option<Value>;

/// Echo of the non-secret probe configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    pub base_url: String,
    pub flavor: ApiFlavor,
    pub model: String,
    pub iterations: usize,
    pub call_delay_secs: u64,
    pub settle_secs: u64,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub os: String,
    pub arch: String,
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Aggregate result of one probe invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Unique run ID
    pub id: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Non-secret configuration echo
    pub config: ReportConfig,

    /// Environment info
    pub environment: EnvironmentInfo,

    /// Usage before any batch ran
    pub usage_before: UsageSnapshot,

    /// Usage after the traditional batch settled
    pub usage_after_traditional: UsageSnapshot,

    /// Usage after the agent batch settled
    pub usage_after_agent: UsageSnapshot,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional: Option<TestRun>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<TestRun>,

    /// Documented assumption under test
    pub hypothesis_note: String,
}

impl ComparisonReport {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            id: generate_run_id(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            config,
            environment: EnvironmentInfo::default(),
            usage_before: None,
            usage_after_traditional: None,
            usage_after_agent: None,
            traditional: None,
            agent: None,
            hypothesis_note: HYPOTHESIS_NOTE.to_string(),
        }
    }

    /// Stamp completion time
    pub fn complete(&mut self) {
        self.completed_at = Utc::now();
    }

    /// Batches present, in run order
    pub fn runs(&self) -> Vec<&TestRun> {
        self.traditional.iter().chain(self.agent.iter()).collect()
    }

    /// Total calls issued across all batches
    pub fn total_calls(&self) -> usize {
        self.runs().iter().map(|r| r.outcomes.len()).sum()
    }

    /// Total billable units expected under the hypothesis
    pub fn total_expected_units(&self) -> usize {
        self.runs().iter().map(|r| r.expected_billable_units()).sum()
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> ReportConfig {
        ReportConfig {
            base_url: "http://localhost:3000".to_string(),
            flavor: ApiFlavor::OpenAi,
            model: "claude-3.5-sonnet".to_string(),
            iterations: 3,
            call_delay_secs: 1,
            settle_secs: 30,
        }
    }

    #[test]
    fn test_mode_hypothesis_units() {
        assert_eq!(TestMode::Traditional.expected_billable_units(3), 3);
        assert_eq!(TestMode::Agent.expected_billable_units(3), 1);
        assert_eq!(TestMode::Agent.expected_billable_units(0), 0);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(TestMode::from_str("agent"), Some(TestMode::Agent));
        assert_eq!(TestMode::from_str("Traditional"), Some(TestMode::Traditional));
        assert_eq!(TestMode::from_str("batch"), None);
    }

    #[test]
    fn test_outcome_success() {
        let outcome = CallOutcome::success(200, json!({"choices": []}), 120);
        assert!(outcome.is_success());
        assert_eq!(outcome.status_code, Some(200));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_outcome_http_failure() {
        let outcome = CallOutcome::http_failure(429, "rate limited", 50);
        assert!(!outcome.is_success());
        assert_eq!(outcome.status_code, Some(429));
        assert_eq!(outcome.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_outcome_transport_failure() {
        let outcome = CallOutcome::transport_failure("connection refused");
        assert!(!outcome.is_success());
        assert_eq!(outcome.status_code, None);
    }

    #[test]
    fn test_run_counters() {
        let mut run = TestRun::traditional(3);
        run.push(CallOutcome::success(200, json!({}), 10));
        run.push(CallOutcome::http_failure(500, "boom", 10));
        run.push(CallOutcome::success(200, json!({}), 10));

        assert_eq!(run.successes(), 2);
        assert_eq!(run.failures(), 1);
        assert_eq!(run.expected_billable_units(), 3);
    }

    #[test]
    fn test_agent_run_carries_correlation_id() {
        let mut run = TestRun::agent(2, "abc-123");
        run.push(CallOutcome::success(200, json!({}), 10));
        run.push(CallOutcome::success(200, json!({}), 10));

        assert_eq!(run.model_call_id.as_deref(), Some("abc-123"));
        assert_eq!(run.expected_billable_units(), 1);
    }

    #[test]
    fn test_report_totals() {
        let mut report = ComparisonReport::new(sample_config());
        let mut traditional = TestRun::traditional(2);
        traditional.push(CallOutcome::success(200, json!({}), 10));
        traditional.push(CallOutcome::success(200, json!({}), 10));
        let mut agent = TestRun::agent(2, "id");
        agent.push(CallOutcome::success(200, json!({}), 10));
        agent.push(CallOutcome::success(200, json!({}), 10));

        report.traditional = Some(traditional);
        report.agent = Some(agent);

        assert_eq!(report.total_calls(), 4);
        assert_eq!(report.total_expected_units(), 3);
    }

    #[test]
    fn test_report_json_round_trip() {
        let mut report = ComparisonReport::new(sample_config());
        report.usage_before = Some(json!({"requests": 42}));
        let mut run = TestRun::traditional(1);
        run.push(CallOutcome::success(200, json!({"choices": []}), 10));
        report.traditional = Some(run);
        report.complete();

        let serialized = serde_json::to_string_pretty(&report).unwrap();
        let parsed: ComparisonReport = serde_json::from_str(&serialized).unwrap();

        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.usage_before, report.usage_before);
        assert_eq!(
            parsed.traditional.as_ref().unwrap().outcomes.len(),
            report.traditional.as_ref().unwrap().outcomes.len()
        );
        assert!(parsed.agent.is_none());
    }
}
