use crate::llm::Provider;
use serde_json::Value;
use std::fmt;

/// Provider failure with enough of the raw exchange attached to debug it from logs.
#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub stage: &'static str,
    pub detail: String,
    pub status: Option<u16>,
    pub raw_response_json: Option<Value>,
}

impl LlmDiagnosticsError {
    pub fn http(provider: Provider, status: reqwest::StatusCode, body: String) -> Self {
        let raw_response_json = serde_json::from_str::<Value>(&body).ok();
        let detail = raw_response_json
            .as_ref()
            .and_then(|v| v.pointer("/error/message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(body);
        Self {
            provider,
            stage: "http",
            detail,
            status: Some(status.as_u16()),
            raw_response_json,
        }
    }

    pub fn blocked(provider: Provider, reason: &str, raw: Value) -> Self {
        Self {
            provider,
            stage: "prompt_feedback",
            detail: format!("prompt blocked: {reason}"),
            status: None,
            raw_response_json: Some(raw),
        }
    }
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "LLM error (provider={:?}, stage={}, status={status}): {}",
                self.provider, self.stage, self.detail
            ),
            None => write!(
                f,
                "LLM error (provider={:?}, stage={}): {}",
                self.provider, self.stage, self.detail
            ),
        }
    }
}

impl std::error::Error for LlmDiagnosticsError {}
