//! Chat-completion wire types
//!
//! Request and response shapes for the two endpoint flavors the probe
//! can target.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Correlation header carrying the batch-wide identifier
pub const HEADER_MODEL_CALL_ID: &str = "X-Model-Call-ID";

/// Correlation header carrying the per-call secondary identifier
pub const HEADER_TOOL_CALL_ID: &str = "X-Tool-Call-ID";

/// Endpoint flavor under test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFlavor {
    /// OpenAI-compatible proxy route
    OpenAi,
    /// Vendor-native chat service route
    Vendor,
}

impl ApiFlavor {
    /// Request path for this flavor
    pub fn chat_path(&self) -> &'static str {
        match self {
            ApiFlavor::OpenAi => "/v1/chat/completions",
            ApiFlavor::Vendor => "/aiserver.v1.ChatService/StreamUnifiedChatWithTools",
        }
    }

    /// Usage inspection path (proxy-only convenience route)
    pub fn usage_path(&self) -> &'static str {
        "/tokens/get"
    }

    pub fn name(&self) -> &'static str {
        match self {
            ApiFlavor::OpenAi => "openai",
            ApiFlavor::Vendor => "vendor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "proxy" => Some(ApiFlavor::OpenAi),
            "vendor" | "official" => Some(ApiFlavor::Vendor),
            _ => None,
        }
    }

    /// The vendor route takes correlation ids in headers only; the
    /// OpenAI route also accepts an embedded metadata object.
    pub fn supports_metadata(&self) -> bool {
        matches!(self, ApiFlavor::OpenAi)
    }

    /// The vendor route streams by contract and rejects the flag.
    pub fn sends_stream_flag(&self) -> bool {
        matches!(self, ApiFlavor::OpenAi)
    }

    pub fn all() -> Vec<ApiFlavor> {
        vec![ApiFlavor::OpenAi, ApiFlavor::Vendor]
    }
}

impl fmt::Display for ApiFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Single chat message
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Correlation metadata embedded in the request body (OpenAI flavor only)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMetadata {
    pub model_call_id: String,
    pub tool_call_id: String,
    pub is_agent_mode: bool,
    pub iteration: usize,
}

/// Chat completion request body
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChatMetadata>,
}

impl ChatRequest {
    /// Build a single-message request for the given flavor
    pub fn new(flavor: ApiFlavor, model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(content)],
            stream: flavor.sends_stream_flag().then_some(false),
            metadata: None,
        }
    }

    /// Attach correlation metadata where the flavor supports it
    pub fn with_metadata(mut self, flavor: ApiFlavor, metadata: ChatMetadata) -> Self {
        if flavor.supports_metadata() {
            self.metadata = Some(metadata);
        }
        self
    }
}

/// Loosely-typed completion response, enough to excerpt the reply
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

impl ChatCompletion {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// First choice's content, truncated for display
    pub fn content_excerpt(&self, max_chars: usize) -> Option<String> {
        let content = &self.choices.first()?.message.as_ref()?.content;
        Some(content.chars().take(max_chars).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flavor_paths() {
        assert_eq!(ApiFlavor::OpenAi.chat_path(), "/v1/chat/completions");
        assert_eq!(
            ApiFlavor::Vendor.chat_path(),
            "/aiserver.v1.ChatService/StreamUnifiedChatWithTools"
        );
        assert_eq!(ApiFlavor::OpenAi.usage_path(), "/tokens/get");
    }

    #[test]
    fn test_flavor_from_str() {
        assert_eq!(ApiFlavor::from_str("openai"), Some(ApiFlavor::OpenAi));
        assert_eq!(ApiFlavor::from_str("VENDOR"), Some(ApiFlavor::Vendor));
        assert_eq!(ApiFlavor::from_str("grpc"), None);
    }

    #[test]
    fn test_request_body_openai() {
        let req = ChatRequest::new(ApiFlavor::OpenAi, "claude-3.5-sonnet", "Test 1");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["stream"], json!(false));
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("metadata").is_none());
    }

    #[test]
    fn test_request_body_vendor_omits_stream_and_metadata() {
        let metadata = ChatMetadata {
            model_call_id: "mc".to_string(),
            tool_call_id: "tc".to_string(),
            is_agent_mode: true,
            iteration: 0,
        };
        let req = ChatRequest::new(ApiFlavor::Vendor, "claude-3.5-sonnet", "Test 1")
            .with_metadata(ApiFlavor::Vendor, metadata);
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("stream").is_none());
        assert!(body.get("metadata").is_none());
    }

    #[test]
    fn test_metadata_attached_for_openai() {
        let metadata = ChatMetadata {
            model_call_id: "mc".to_string(),
            tool_call_id: "tc".to_string(),
            is_agent_mode: true,
            iteration: 2,
        };
        let req = ChatRequest::new(ApiFlavor::OpenAi, "claude-3.5-sonnet", "Agent test 3")
            .with_metadata(ApiFlavor::OpenAi, metadata);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["metadata"]["model_call_id"], "mc");
        assert_eq!(body["metadata"]["is_agent_mode"], json!(true));
        assert_eq!(body["metadata"]["iteration"], json!(2));
    }

    #[test]
    fn test_content_excerpt() {
        let value = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello there"}}]
        });
        let completion = ChatCompletion::from_value(&value).unwrap();
        assert_eq!(completion.content_excerpt(5), Some("Hello".to_string()));
    }

    #[test]
    fn test_content_excerpt_missing_choices() {
        let completion = ChatCompletion::from_value(&json!({"id": "x"})).unwrap();
        assert_eq!(completion.content_excerpt(5), None);
    }
}
