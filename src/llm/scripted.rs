//! Deterministic client for tests and offline runs
//!
//! Replays a queue of canned responses or errors, one per call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{CrewError, Part, Result};
use crate::llm::traits::{GenerateRequest, ModelClient, ModelResponse};

/// Scripted model client
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<ModelResponse>>>,
    /// Text parts of every request received, in call order
    seen: Mutex<Vec<Vec<String>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    /// Create a client that answers with `script` in order
    pub fn new(script: Vec<Result<ModelResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a client that always succeeds with the given responses
    pub fn responses(responses: Vec<ModelResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    /// Number of `generate` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Text parts of each request, in call order
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<ModelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Ok(mut seen) = self.seen.lock() {
            seen.push(
                request
                    .contents
                    .iter()
                    .filter_map(Part::as_text)
                    .map(str::to_string)
                    .collect(),
            );
        }

        let mut script = self
            .script
            .lock()
            .map_err(|_| CrewError::Other("scripted client poisoned".to_string()))?;
        script
            .pop_front()
            .unwrap_or_else(|| Err(CrewError::Other("scripted client ran out of responses".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
