//! Model client trait for abstracting the generative API
//!
//! Agents only see this contract; the Gemini client and the scripted client
//! both implement it.

use async_trait::async_trait;

use crate::core::{FinishReason, GenerationConfig, Part, Result, ToolCall};

/// Response from a model call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    /// Concatenated text of the first candidate, if any
    pub text: Option<String>,
    /// Structured payload when JSON output was requested and parsed
    pub parsed: Option<serde_json::Value>,
    /// Tool invocations requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// Completion reason of the first candidate
    pub finish_reason: Option<FinishReason>,
    /// Token usage information
    pub usage: Option<TokenUsage>,
    /// Model that generated the response
    pub model: String,
}

impl ModelResponse {
    /// Plain text response that finished naturally
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }
    }

    /// Structured response that finished naturally
    pub fn parsed(value: serde_json::Value) -> Self {
        Self {
            text: Some(value.to_string()),
            parsed: Some(value),
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }
    }

    /// Response carrying tool invocations
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }
    }

    /// Override the finish reason
    pub fn with_finish_reason(mut self, reason: Option<FinishReason>) -> Self {
        self.finish_reason = reason;
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One model invocation
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Agent scratchpad, sent as system instruction
    pub system_instruction: Option<&'a str>,
    /// Context part (if any) followed by the task parts
    pub contents: Vec<Part>,
    /// Generation parameters and declared tools
    pub config: &'a GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    /// Build the request contents: the rendered memory first (when
    /// non-empty), then the task payload.
    pub fn new(
        model: &'a str,
        system_instruction: Option<&'a str>,
        task: &[Part],
        context: &str,
        config: &'a GenerationConfig,
    ) -> Self {
        let mut contents = Vec::with_capacity(task.len() + 1);
        if !context.is_empty() {
            contents.push(Part::text(context));
        }
        contents.extend(task.iter().cloned());

        Self {
            model,
            system_instruction: system_instruction.filter(|s| !s.is_empty()),
            contents,
            config,
        }
    }
}

/// Trait for generative model backends
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one generation request
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<ModelResponse>;

    /// Get the client name
    fn name(&self) -> &str;
}
