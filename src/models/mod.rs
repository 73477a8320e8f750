//! Data models for the billing probe
//!
//! This module contains all data structures used throughout the application.

mod chat;
mod outcome;

pub use chat::{
    ApiFlavor, ChatCompletion, ChatMessage, ChatMetadata, ChatRequest, HEADER_MODEL_CALL_ID,
    HEADER_TOOL_CALL_ID,
};
pub use outcome::{
    CallOutcome, ComparisonReport, EnvironmentInfo, ReportConfig, TestMode, TestRun,
    UsageSnapshot, HYPOTHESIS_NOTE,
};
