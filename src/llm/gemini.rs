//! Gemini client implementation
//!
//! Async HTTP client for the `generateContent` REST endpoint with function
//! calling, Google Search grounding, structured output and inline binary
//! attachments.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{
    Config, CrewError, FinishReason, FunctionDeclaration, GenerationConfig, Part, Result,
    ToolCall, ToolSpec,
};
use crate::llm::traits::{GenerateRequest, ModelClient, ModelResponse, TokenUsage};

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_root: String,
    api_key: String,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
}

/// Content block (request and response)
#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

/// A single part; exactly one field is set
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireBlob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<WireFunctionCall>,
}

/// Base64 attachment
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlob {
    mime_type: String,
    data: String,
}

/// Function call requested by the model
#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

/// Generation options
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<String>,
}

/// Tool entry; exactly one field is set
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    function_declarations: Option<&'a [FunctionDeclaration]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_search: Option<GoogleSearch>,
}

/// Serializes as `{}`
#[derive(Debug, Serialize)]
struct GoogleSearch {}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    usage_metadata: Option<WireUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl GeminiClient {
    /// Create a client for a versioned API root
    pub fn new(
        api_root: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_root: api_root.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.gemini.api_root(),
            config.require_api_key()?,
            Duration::from_secs(config.gemini.timeout_secs),
        )
    }

    /// Convert an internal part to wire format
    fn to_wire_part(part: &Part) -> WirePart {
        match part {
            Part::Text(text) => WirePart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::InlineData { mime_type, data } => WirePart {
                inline_data: Some(WireBlob {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(data),
                }),
                ..Default::default()
            },
        }
    }

    fn to_wire_tools(tools: &[ToolSpec]) -> Vec<WireTool<'_>> {
        tools
            .iter()
            .map(|tool| match tool {
                ToolSpec::Functions(declarations) => WireTool {
                    function_declarations: Some(declarations.as_slice()),
                    google_search: None,
                },
                ToolSpec::GoogleSearch => WireTool {
                    function_declarations: None,
                    google_search: Some(GoogleSearch {}),
                },
            })
            .collect()
    }

    fn to_wire_config(config: &GenerationConfig) -> Option<WireGenerationConfig<'_>> {
        let wire = WireGenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            response_mime_type: config.response_mime_type.as_deref(),
            response_schema: config.response_schema.as_ref(),
            response_modalities: config.response_modalities.clone(),
        };

        let empty = wire.temperature.is_none()
            && wire.max_output_tokens.is_none()
            && wire.response_mime_type.is_none()
            && wire.response_schema.is_none()
            && wire.response_modalities.is_empty();
        (!empty).then_some(wire)
    }

    fn build_body<'a>(request: &'a GenerateRequest<'_>) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![WireContent {
                role: Some("user".to_string()),
                parts: request.contents.iter().map(Self::to_wire_part).collect(),
            }],
            system_instruction: request.system_instruction.map(|text| WireContent {
                role: None,
                parts: vec![WirePart {
                    text: Some(text.to_string()),
                    ..Default::default()
                }],
            }),
            generation_config: Self::to_wire_config(request.config),
            tools: Self::to_wire_tools(&request.config.tools),
        }
    }

    /// Convert the first candidate into a ModelResponse
    fn to_model_response(
        response: GenerateContentResponse,
        requested_model: &str,
        wants_json: bool,
    ) -> Result<ModelResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| CrewError::response("No candidates in Gemini response"))?;

        let mut texts = Vec::new();
        let mut tool_calls = Vec::new();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(text) = part.text {
                texts.push(text);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(ToolCall::new(call.name, call.args));
            }
        }

        let text = (!texts.is_empty()).then(|| texts.concat());
        let parsed = match (&text, wants_json) {
            (Some(text), true) => match serde_json::from_str(text) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Structured output did not parse as JSON: {}", e);
                    None
                }
            },
            _ => None,
        };

        Ok(ModelResponse {
            text,
            parsed,
            tool_calls,
            finish_reason: candidate.finish_reason.as_deref().map(FinishReason::from_wire),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            model: response
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<ModelResponse> {
        let body = Self::build_body(request);
        let url = format!("{}/models/{}:generateContent", self.api_root, request.model);
        debug!("POST {} ({} parts)", url, request.contents.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CrewError::status(status.as_u16(), error_text));
        }

        let response_text = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| CrewError::response(format!("Failed to parse response: {}", e)))?;

        Self::to_model_response(parsed, request.model, request.config.wants_json())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
