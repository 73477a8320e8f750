//! Correlation identifier generation
//!
//! The agent-mode hypothesis rides on two client-generated
//! identifiers: one batch-wide correlation id and one per-call
//! secondary id that embeds it.

use uuid::Uuid;

/// Delimiter the proxy splits the composed secondary id on
const MODEL_CALL_DELIMITER: &str = "\nmc_";

/// Generate the batch-wide correlation identifier
pub fn new_model_call_id() -> String {
    Uuid::new_v4().to_string()
}

/// Compose a per-call secondary identifier embedding the batch id
pub fn compose_tool_call_id(model_call_id: &str) -> String {
    format!("call_{}{MODEL_CALL_DELIMITER}{model_call_id}", Uuid::new_v4())
}

/// Header rendering of a composed id. Header values cannot carry the
/// raw newline delimiter.
pub fn header_value(composed: &str) -> String {
    composed.replace('\n', " ")
}
