//! Shared types used across verbal-crew modules
//!
//! Contains task payloads, tool call and declaration structures, and
//! generation settings.

use serde::Serialize;

/// One piece of a task payload sent to the model
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Plain text
    Text(String),
    /// Binary attachment (e.g. a PDF)
    InlineData { mime_type: String, data: Vec<u8> },
}

impl Part {
    /// Create a text part
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Create a binary attachment part
    pub fn bytes(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self::InlineData {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::InlineData { .. } => None,
        }
    }
}

impl From<&str> for Part {
    fn from(value: &str) -> Self {
        Part::text(value)
    }
}

impl From<String> for Part {
    fn from(value: String) -> Self {
        Part::Text(value)
    }
}

/// The payload an agent executes on every iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub parts: Vec<Part>,
}

impl Task {
    /// Create a task from parts
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Create a single-text task
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(content)],
        }
    }

    /// Append a part
    pub fn with_part(mut self, part: impl Into<Part>) -> Self {
        self.parts.push(part.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Name of the tool to invoke
    pub name: String,
    /// JSON arguments for the tool
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Get a string argument by key
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

/// Declaration of a function the model may call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// OpenAPI-style schema for the parameters
    pub parameters: serde_json::Value,
}

impl FunctionDeclaration {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool offered to the model
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSpec {
    /// Client-side functions; calls come back as [`ToolCall`]s
    Functions(Vec<FunctionDeclaration>),
    /// Server-side grounding with Google Search
    GoogleSearch,
}

/// Generation parameters attached to every model call of an agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// e.g. "application/json" for structured output
    pub response_mime_type: Option<String>,
    /// Schema the structured output must follow
    pub response_schema: Option<serde_json::Value>,
    /// e.g. ["TEXT"]
    pub response_modalities: Vec<String>,
    pub tools: Vec<ToolSpec>,
}

impl GenerationConfig {
    /// Structured JSON output following `schema`
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }

    /// Whether the model was asked for JSON output
    pub fn wants_json(&self) -> bool {
        self.response_mime_type
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("application/json"))
    }

    pub fn with_tool(mut self, tool: ToolSpec) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_modalities(mut self, modalities: &[&str]) -> Self {
        self.response_modalities = modalities.iter().map(|m| m.to_string()).collect();
        self
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural stop point
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other(String),
}

impl FinishReason {
    /// Parse the wire value (e.g. "STOP")
    pub fn from_wire(value: &str) -> Self {
        match value {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "STOP"),
            FinishReason::MaxTokens => write!(f, "MAX_TOKENS"),
            FinishReason::Safety => write!(f, "SAFETY"),
            FinishReason::Recitation => write!(f, "RECITATION"),
            FinishReason::Other(other) => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_builder() {
        let task = Task::new(vec![Part::bytes("application/pdf", vec![1, 2, 3])])
            .with_part("Review my CV");
        assert_eq!(task.parts.len(), 2);
        assert_eq!(task.parts[1].as_text(), Some("Review my CV"));
        assert!(task.parts[0].as_text().is_none());
    }

    #[test]
    fn test_tool_call_get_string() {
        let call = ToolCall::new("search", json!({"job_title": "Rust engineer", "n": 3}));
        assert_eq!(call.get_string("job_title").as_deref(), Some("Rust engineer"));
        assert!(call.get_string("n").is_none());
        assert!(call.get_string("missing").is_none());
    }

    #[test]
    fn test_finish_reason_round_trip() {
        for wire in ["STOP", "MAX_TOKENS", "SAFETY", "RECITATION", "BLOCKLIST"] {
            assert_eq!(FinishReason::from_wire(wire).to_string(), wire);
        }
        assert_eq!(FinishReason::from_wire("STOP"), FinishReason::Stop);
    }

    #[test]
    fn test_wants_json() {
        assert!(GenerationConfig::json(json!({"type": "ARRAY"})).wants_json());
        assert!(!GenerationConfig::default().wants_json());
    }

    #[test]
    fn test_function_declaration_serializes_as_wire_shape() {
        let decl = FunctionDeclaration::new(
            "get_jobs_posts_from_glassdoor",
            "Return job posts from Glassdoor.",
            json!({"type": "OBJECT"}),
        );
        assert_eq!(
            serde_json::to_value(&decl).unwrap(),
            json!({
                "name": "get_jobs_posts_from_glassdoor",
                "description": "Return job posts from Glassdoor.",
                "parameters": {"type": "OBJECT"}
            })
        );
    }
}
