//! Results persistence
//!
//! Writes the aggregate comparison report as a single JSON file in
//! the working directory. Each run overwrites the prior file; there
//! is no schema versioning and no append semantics.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::ComparisonReport;

/// Results storage bound to one file path
pub struct ResultsStorage {
    path: PathBuf,
}

impl ResultsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the report, replacing any previous file
    pub fn save(&self, report: &ComparisonReport) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, report).context("Failed to serialize report")?;

        info!("Results saved to {}", self.path.display());
        Ok(())
    }

    /// Read a previously saved report
    pub fn load(&self) -> Result<ComparisonReport> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader).context("Failed to parse results file")
    }

    /// Export per-call outcomes as CSV
    pub fn export_csv(&self, report: &ComparisonReport, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())
            .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;

        writer.write_record(["mode", "call", "status", "ok", "duration_ms", "error"])?;

        for run in report.runs() {
            for (i, outcome) in run.outcomes.iter().enumerate() {
                writer.write_record([
                    run.mode.name().to_string(),
                    (i + 1).to_string(),
                    outcome
                        .status_code
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                    outcome.is_success().to_string(),
                    outcome.duration_ms.to_string(),
                    outcome.error.clone().unwrap_or_default(),
                ])?;
            }
        }

        writer.flush()?;
        info!("CSV exported to {}", path.as_ref().display());
        Ok(())
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
            iterations: 2,
            call_delay_secs: 1,
            settle_secs: 30,
        };

        let mut report = ComparisonReport::new(config);
        report.usage_before = Some(json!({"requests": 10}));

        let mut traditional = TestRun::traditional(2);
        traditional.push(CallOutcome::success(200, json!({"choices": []}), 100));
        traditional.push(CallOutcome::http_failure(500, "server error", 40));
        report.traditional = Some(traditional);

        let mut agent = TestRun::agent(2, "mc-1");
        agent.push(CallOutcome::success(200, json!({"choices": []}), 90));
        agent.push(CallOutcome::transport_failure("connection reset"));
        report.agent = Some(agent);

        report.complete();
        report
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results.json"));
        let report = sample_report();

        storage.save(&report).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.usage_before, report.usage_before);
        assert_eq!(loaded.total_calls(), report.total_calls());
        assert_eq!(
            loaded.agent.as_ref().unwrap().model_call_id,
            report.agent.as_ref().unwrap().model_call_id
        );
    }

    #[test]
    fn test_save_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results.json"));

        let first = sample_report();
        let second = sample_report();
        storage.save(&first).unwrap();
        storage.save(&second).unwrap();

        assert_eq!(storage.load().unwrap().id, second.id);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("absent.json"));
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_csv_export_one_row_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results.json"));
        let csv_path = dir.path().join("outcomes.csv");

        storage.export_csv(&sample_report(), &csv_path).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("mode,call,status"));
        assert!(lines[1].starts_with("traditional,1,200,true"));
        assert!(lines[4].starts_with("agent,2,,false"));
    }
}
