//! Output formatters for probe results
//!
//! Provides table, JSON, and summary output for the comparison
//! report, plus the phase banners shown during a run.

#![allow(dead_code)]

use crate::models::{ChatCompletion, ComparisonReport, TestRun};
use crate::results::ComparisonSummary;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format the aggregate report
    pub fn format_report(&self, report: &ComparisonReport) -> String {
        match self.format {
            OutputFormat::Table => self.format_report_table(report),
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Summary => ComparisonSummary::from_report(report).to_string(),
        }
    }

    fn format_report_table(&self, report: &ComparisonReport) -> String {
        let mut out = String::new();

        for run in report.runs() {
            out.push_str(&format_run_table(run));
            out.push('\n');
        }
        out.push_str(&ComparisonSummary::from_report(report).to_string());
        out
    }
}

fn format_run_table(run: &TestRun) -> String {
    let mut out = format!("{run}\n");

    for (i, outcome) in run.outcomes.iter().enumerate() {
        out.push_str(&format!("  {:2}. {outcome}", i + 1));

        let excerpt = outcome
            .response
            .as_ref()
            .and_then(ChatCompletion::from_value)
            .and_then(|c| c.content_excerpt(60));
        if let Some(text) = excerpt {
            out.push_str(&format!(" - {text}"));
        }
        out.push('\n');
    }

    out
}

/// Phase banner printed between run phases
pub fn banner(title: &str) -> String {
    let line = "=".repeat(60);
    format!("{line}\n{title}\n{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiFlavor, CallOutcome, ReportConfig, TestRun};
    use serde_json::json;

    fn sample_report() -> ComparisonReport {
        let config = ReportConfig {
            base_url: "http://localhost:3000".to_string(),
            flavor: ApiFlavor::OpenAi,
            model: "claude-3.5-sonnet".to_string(),
            iterations: 1,
            call_delay_secs: 1,
            settle_secs: 0,
        };

        let mut report = ComparisonReport::new(config);
        let mut run = TestRun::traditional(1);
        run.push(CallOutcome::success(
            200,
            json!({"choices": [{"message": {"role": "assistant", "content": "Hello!"}}]}),
            12,
        ));
        report.traditional = Some(run);
        report
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("table"), Some(OutputFormat::Table));
        assert_eq!(
            OutputFormat::from_str("JSON-Pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_every_format_renders() {
        let report = sample_report();
        for format in [
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::JsonPretty,
            OutputFormat::Summary,
        ] {
            let text = ResultFormatter::new(format).format_report(&report);
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn test_table_excerpts_reply() {
        let text = ResultFormatter::new(OutputFormat::Table).format_report(&sample_report());
        assert!(text.contains("Hello!"));
        assert!(text.contains("✓ 200"));
    }

    #[test]
    fn test_json_round_trips() {
        let report = sample_report();
        let text = ResultFormatter::new(OutputFormat::Json).format_report(&report);
        let parsed: ComparisonReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.id, report.id);
    }

    #[test]
    fn test_banner_shape() {
        let text = banner("Phase 1");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 60);
        assert_eq!(lines[1], "Phase 1");
    }
}
