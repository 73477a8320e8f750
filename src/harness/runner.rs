//! Probe batch driver
//!
//! Drives the traditional and agent-mode batches against the
//! configured chat endpoint and assembles the comparison report.
//! Correlation-id reuse affecting billing is the hypothesis under
//! test, not behavior this module can verify on its own.

#![allow(dead_code)]

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use super::ids;
use crate::config::{pause, ProbeConfig};
use crate::http::HttpClient;
use crate::models::{
    CallOutcome, ChatMetadata, ChatRequest, ComparisonReport, TestMode, TestRun, UsageSnapshot,
    HEADER_MODEL_CALL_ID, HEADER_TOOL_CALL_ID,
};

/// Sequential batch driver sharing one HTTP session
pub struct ProbeRunner {
    config: ProbeConfig,
    client: HttpClient,
}

impl ProbeRunner {
    /// Create a runner from resolved configuration
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let client = HttpClient::new(&config.base_url)?.bearer_token(&config.token)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run one batch of uncorrelated calls
    pub async fn run_traditional_batch(&self, iterations: usize) -> TestRun {
        info!(
            "Traditional batch: {} calls ({})",
            iterations,
            TestMode::Traditional.hypothesis()
        );

        let mut run = TestRun::traditional(iterations);

        for i in 0..iterations {
            info!("Call {}/{}", i + 1, iterations);

            let request = ChatRequest::new(
                self.config.flavor,
                &self.config.model,
                format!("Test iteration {}", i + 1),
            );

            let outcome = self.send_chat(&request, HashMap::new()).await;
            info!("  {outcome}");
            run.push(outcome);

            self.pace().await;
        }

        run
    }

    /// Run one batch of calls sharing a single correlation identifier
    pub async fn run_agent_batch(&self, iterations: usize) -> TestRun {
        let model_call_id = ids::new_model_call_id();

        info!(
            "Agent batch: {} calls sharing model_call_id {} ({})",
            iterations,
            model_call_id,
            TestMode::Agent.hypothesis()
        );

        let mut run = TestRun::agent(iterations, &model_call_id);

        for i in 0..iterations {
            let tool_call_id = ids::compose_tool_call_id(&model_call_id);

            info!("Call {}/{}", i + 1, iterations);

            let metadata = ChatMetadata {
                model_call_id: model_call_id.clone(),
                tool_call_id: tool_call_id.clone(),
                is_agent_mode: true,
                iteration: i,
            };

            let request = ChatRequest::new(
                self.config.flavor,
                &self.config.model,
                format!("Agent iteration {}", i + 1),
            )
            .with_metadata(self.config.flavor, metadata);

            let mut headers = HashMap::new();
            headers.insert(HEADER_MODEL_CALL_ID.to_string(), model_call_id.clone());
            headers.insert(
                HEADER_TOOL_CALL_ID.to_string(),
                ids::header_value(&tool_call_id),
            );

            let outcome = self.send_chat(&request, headers).await;
            info!("  {outcome}");
            run.push(outcome);

            self.pace().await;
        }

        run
    }

    /// Best-effort usage read; absence or failure is never an error
    pub async fn inspect_usage(&self) -> UsageSnapshot {
        match self.client.get(self.config.flavor.usage_path()).await {
            Ok(resp) if resp.is_success() => resp.json_body().ok(),
            Ok(resp) => {
                warn!("Usage endpoint returned {}", resp.status_code);
                None
            }
            Err(e) => {
                warn!("Usage inspection failed: {e}");
                None
            }
        }
    }

    /// Full comparison sequence: snapshot, traditional batch, settle,
    /// snapshot, agent batch, settle, snapshot
    pub async fn run_comparison(&self) -> Result<ComparisonReport> {
        let iterations = self.config.iterations;
        let mut report = ComparisonReport::new(self.config.report_config());

        report.usage_before = self.inspect_usage().await;
        self.confirm("Record the current dashboard usage")?;

        report.traditional = Some(self.run_traditional_batch(iterations).await);
        self.settle().await;
        report.usage_after_traditional = self.inspect_usage().await;

        self.confirm("Traditional batch done; continue with the agent batch")?;

        report.agent = Some(self.run_agent_batch(iterations).await);
        self.settle().await;
        report.usage_after_agent = self.inspect_usage().await;

        report.complete();
        Ok(report)
    }

    /// Run a single batch, with usage snapshots around it
    pub async fn run_single(&self, mode: TestMode) -> Result<ComparisonReport> {
        let iterations = self.config.iterations;
        let mut report = ComparisonReport::new(self.config.report_config());

        report.usage_before = self.inspect_usage().await;

        match mode {
            TestMode::Traditional => {
                report.traditional = Some(self.run_traditional_batch(iterations).await);
                self.settle().await;
                report.usage_after_traditional = self.inspect_usage().await;
            }
            TestMode::Agent => {
                report.agent = Some(self.run_agent_batch(iterations).await);
                self.settle().await;
                report.usage_after_agent = self.inspect_usage().await;
            }
        }

        report.complete();
        Ok(report)
    }

    /// Issue one chat call and record it, whatever happens
    async fn send_chat(&self, request: &ChatRequest, headers: HashMap<String, String>) -> CallOutcome {
        let path = self.config.flavor.chat_path();

        match self
            .client
            .post_json_with_headers(path, request, headers)
            .await
        {
            Ok(resp) if resp.is_success() => match resp.json_body() {
                Ok(value) => CallOutcome::success(resp.status_code, value, resp.duration_ms),
                // Vendor route streams; keep unparseable bodies raw
                Err(_) => CallOutcome::success(
                    resp.status_code,
                    Value::String(resp.body),
                    resp.duration_ms,
                ),
            },
            Ok(resp) => CallOutcome::http_failure(resp.status_code, resp.body, resp.duration_ms),
            Err(e) => CallOutcome::transport_failure(e.to_string()),
        }
    }

    /// Fixed inter-call delay to avoid rate limiting
    async fn pace(&self) {
        if self.config.call_delay_secs > 0 {
            sleep(Duration::from_secs(self.config.call_delay_secs)).await;
        }
    }

    /// Wait for the billing backend to catch up before a snapshot
    async fn settle(&self) {
        if self.config.settle_secs > 0 {
            info!("Waiting {}s for usage to settle...", self.config.settle_secs);
            sleep(Duration::from_secs(self.config.settle_secs)).await;
        }
    }

    fn confirm(&self, message: &str) -> Result<()> {
        if self.config.assume_yes {
            return Ok(());
        }
        pause(message)
    }
}
