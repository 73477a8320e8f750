//! Human-readable comparison summary
//!
//! Reduces a comparison report to the numbers the operator needs to
//! check against the billing dashboard.

#![allow(dead_code)]

use std::fmt;

use crate::models::{ComparisonReport, TestMode, TestRun, UsageSnapshot};

/// Per-mode roll-up
#[derive(Clone, Debug)]
pub struct ModeSummary {
    pub mode: TestMode,
    pub calls: usize,
    pub successes: usize,
    pub failures: usize,
    /// Billable units expected if the hypothesis holds
    pub expected_units: usize,
    pub model_call_id: Option<String>,
}

impl ModeSummary {
    fn from_run(run: &TestRun) -> Self {
        Self {
            mode: run.mode,
            calls: run.outcomes.len(),
            successes: run.successes(),
            failures: run.failures(),
            expected_units: run.expected_billable_units(),
            model_call_id: run.model_call_id.clone(),
        }
    }
}

/// Operator-facing comparison summary
#[derive(Clone, Debug)]
pub struct ComparisonSummary {
    pub run_id: String,
    pub modes: Vec<ModeSummary>,
    pub usage_before: UsageSnapshot,
    pub usage_after_traditional: UsageSnapshot,
    pub usage_after_agent: UsageSnapshot,
    pub hypothesis_note: String,
}

impl ComparisonSummary {
    pub fn from_report(report: &ComparisonReport) -> Self {
        Self {
            run_id: report.id.clone(),
            modes: report.runs().into_iter().map(ModeSummary::from_run).collect(),
            usage_before: report.usage_before.clone(),
            usage_after_traditional: report.usage_after_traditional.clone(),
            usage_after_agent: report.usage_after_agent.clone(),
            hypothesis_note: report.hypothesis_note.clone(),
        }
    }

    /// Total calls across modes
    pub fn total_calls(&self) -> usize {
        self.modes.iter().map(|m| m.calls).sum()
    }

    /// Total billable units expected under the hypothesis
    pub fn total_expected_units(&self) -> usize {
        self.modes.iter().map(|m| m.expected_units).sum()
    }
}

fn render_snapshot(snapshot: &UsageSnapshot) -> String {
    match snapshot {
        Some(value) => serde_json::to_string(value).unwrap_or_else(|_| "<unreadable>".to_string()),
        None => "<unavailable>".to_string(),
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {}", self.run_id)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;

        for mode in &self.modes {
            writeln!(
                f,
                "  {:12} {} calls | {} ok | {} failed | expected units: {}",
                mode.mode.name(),
                mode.calls,
                mode.successes,
                mode.failures,
                mode.expected_units
            )?;
            if let Some(id) = &mode.model_call_id {
                writeln!(f, "  {:12} model_call_id: {id}", "")?;
            }
            writeln!(f, "  {:12} hypothesis: {}", "", mode.mode.hypothesis())?;
        }

        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} calls | expected billable units if reuse works: {}",
            self.total_calls(),
            self.total_expected_units()
        )?;
        writeln!(f, "Usage before:            {}", render_snapshot(&self.usage_before))?;
        writeln!(
            f,
            "Usage after traditional: {}",
            render_snapshot(&self.usage_after_traditional)
        )?;
        writeln!(
            f,
            "Usage after agent:       {}",
            render_snapshot(&self.usage_after_agent)
        )?;
        writeln!(f)?;
        writeln!(f, "Note: {}", self.hypothesis_note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiFlavor, CallOutcome, ComparisonReport, ReportConfig, TestRun};
    use serde_json::json;

    fn sample_report() -> ComparisonReport {
        let config = ReportConfig {
            base_url: "http://localhost:3000".to_string(),
            flavor: ApiFlavor::OpenAi,
            model: "claude-3.5-sonnet".to_string(),
            iterations: 3,
            call_delay_secs: 1,
            settle_secs: 30,
        };

        let mut report = ComparisonReport::new(config);

        let mut traditional = TestRun::traditional(3);
        for _ in 0..3 {
            traditional.push(CallOutcome::success(200, json!({}), 10));
        }
        report.traditional = Some(traditional);

        let mut agent = TestRun::agent(3, "mc-9");
        for _ in 0..3 {
            agent.push(CallOutcome::success(200, json!({}), 10));
        }
        report.agent = Some(agent);
        report.usage_before = Some(json!({"requests": 10}));

        report
    }

    #[test]
    fn test_summary_totals() {
        let summary = ComparisonSummary::from_report(&sample_report());

        assert_eq!(summary.modes.len(), 2);
        assert_eq!(summary.total_calls(), 6);
        assert_eq!(summary.total_expected_units(), 4);
    }

    #[test]
    fn test_summary_render_mentions_dashboard_check() {
        let summary = ComparisonSummary::from_report(&sample_report());
        let text = summary.to_string();

        assert!(text.contains("traditional"));
        assert!(text.contains("model_call_id: mc-9"));
        assert!(text.contains("expected billable units if reuse works: 4"));
        assert!(text.contains("<unavailable>"));
        assert!(text.contains("dashboard"));
    }
}
