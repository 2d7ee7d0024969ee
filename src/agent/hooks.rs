//! Pluggable agent behavior
//!
//! An agent is configured with three functions: what to do with a requested
//! tool call, what to do with a plain model output, and when to stop.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::agent::memory::MemoryStore;
use crate::core::{CrewError, FinishReason, Result, ToolCall};
use crate::llm::ModelResponse;

/// Called once per requested tool invocation with the agent's name
pub type ToolCallHook = Arc<dyn Fn(&str, &ToolCall) -> Result<()> + Send + Sync>;

/// Called with a response that requested no tools
pub type OutputHook = Arc<dyn Fn(&ModelResponse, &mut MemoryStore) -> Result<()> + Send + Sync>;

/// Decides from a response whether the loop should stop successfully
pub type TerminationPredicate = Arc<dyn Fn(&ModelResponse) -> bool + Send + Sync>;

/// Memory section written by [`record_categories`] in the job-search crew
pub const JOB_CATEGORIES_SECTION: &str = "job-categories";

/// Memory section written by [`record_text`] in the job-search crew
pub const JOBS_SECTION: &str = "jobs";

/// Log the call and drop it. Tool results are never fed back to the model.
pub fn log_tool_call() -> ToolCallHook {
    Arc::new(|agent: &str, call: &ToolCall| -> Result<()> {
        info!(
            "[{}] Using tool: {} with args: {}",
            agent, call.name, call.arguments
        );
        Ok(())
    })
}

/// Discard model output
pub fn ignore_output() -> OutputHook {
    Arc::new(|_: &ModelResponse, _: &mut MemoryStore| -> Result<()> { Ok(()) })
}

/// A category record in structured model output
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Append the title of every parsed category record to `section`.
///
/// Responses without a parsed payload are ignored; a payload that is not a
/// list of records with a `title` fails the iteration.
pub fn record_categories(section: impl Into<String>) -> OutputHook {
    let section = section.into();
    Arc::new(move |response: &ModelResponse, memory: &mut MemoryStore| -> Result<()> {
        let Some(parsed) = &response.parsed else {
            return Ok(());
        };
        let records: Vec<CategoryRecord> = serde_json::from_value(parsed.clone())
            .map_err(|e| CrewError::hook(format!("expected a list of categories: {}", e)))?;
        for record in records {
            memory.append(&section, record.title);
        }
        Ok(())
    })
}

/// Append the raw response text to `section`; responses without text are ignored
pub fn record_text(section: impl Into<String>) -> OutputHook {
    let section = section.into();
    Arc::new(move |response: &ModelResponse, memory: &mut MemoryStore| -> Result<()> {
        if let Some(text) = &response.text {
            memory.append(&section, text.clone());
        }
        Ok(())
    })
}

/// Stop when the model reports a natural stop. Reads the finish reason
/// without touching the response.
pub fn stop_on_finish() -> TerminationPredicate {
    Arc::new(|response: &ModelResponse| response.finish_reason == Some(FinishReason::Stop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_categories() {
        let hook = record_categories(JOB_CATEGORIES_SECTION);
        let mut memory = MemoryStore::new();
        let response = ModelResponse::parsed(json!([
            {"title": "Backend Developer", "description": "Server-side work"},
            {"title": "Site Reliability Engineer", "description": "Operations"}
        ]));

        hook(&response, &mut memory).unwrap();
        assert_eq!(
            memory.entries(JOB_CATEGORIES_SECTION),
            vec!["Backend Developer", "Site Reliability Engineer"]
        );
    }

    #[test]
    fn test_record_categories_without_parsed_payload() {
        let hook = record_categories(JOB_CATEGORIES_SECTION);
        let mut memory = MemoryStore::new();

        hook(&ModelResponse::text("not json"), &mut memory).unwrap();
        assert!(memory.is_empty());
    }

    #[test]
    fn test_record_categories_rejects_malformed_payload() {
        let hook = record_categories(JOB_CATEGORIES_SECTION);
        let mut memory = MemoryStore::new();

        let err = hook(&ModelResponse::parsed(json!({"title": "x"})), &mut memory).unwrap_err();
        assert!(matches!(err, CrewError::Hook(_)));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_record_text() {
        let hook = record_text(JOBS_SECTION);
        let mut memory = MemoryStore::new();

        hook(&ModelResponse::text("Rust Engineer - Acme - Remote"), &mut memory).unwrap();
        hook(&ModelResponse::default(), &mut memory).unwrap();
        assert_eq!(memory.entries(JOBS_SECTION), vec!["Rust Engineer - Acme - Remote"]);
    }

    #[test]
    fn test_stop_on_finish_is_non_destructive() {
        let stop = stop_on_finish();
        let response = ModelResponse::text("done");

        assert!(stop(&response));
        assert!(stop(&response));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));

        let truncated = ModelResponse::text("cut").with_finish_reason(Some(FinishReason::MaxTokens));
        assert!(!stop(&truncated));
        assert!(!stop(&ModelResponse::default()));
    }

    #[test]
    fn test_log_tool_call_succeeds() {
        let hook = log_tool_call();
        let call = ToolCall::new("search", json!({"q": "rust"}));
        assert!(hook("Searcher", &call).is_ok());
    }
}
