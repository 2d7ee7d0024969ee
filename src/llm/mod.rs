//! LLM module - model invocation boundary
//!
//! Provides the client abstraction agents call through, the Gemini backend,
//! a scripted backend, and retry handling.

pub mod gemini;
pub mod retry;
pub mod scripted;
pub mod traits;

pub use gemini::GeminiClient;
pub use retry::{call_with_retry, RetryPolicy};
pub use scripted::ScriptedClient;
pub use traits::{GenerateRequest, ModelClient, ModelResponse, TokenUsage};
