//! Verbal Crew - sequential multi-agent orchestration over Gemini
//!
//! Agents run a bounded call/act loop against a model, write what they learn
//! into a sectioned memory store, and are chained into pipelines where each
//! agent sees everything the ones before it wrote.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, logging and error handling
//! - **LLM**: Model client abstraction, Gemini backend and retry policy
//! - **Agent**: Memory store, agent loop, hooks and sequential pipeline
//! - **CLI**: The job-search crew driven by the binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use verbal_crew::agent::hooks::{record_text, stop_on_finish};
//! use verbal_crew::core::Task;
//! use verbal_crew::{Agent, Config, GeminiClient};
//!
//! #[tokio::main]
//! async fn main() -> verbal_crew::Result<()> {
//!     let config = Config::load();
//!     let client = Arc::new(GeminiClient::from_config(&config)?);
//!
//!     let writer = Agent::builder("Writer")
//!         .config(&config.agent)
//!         .client(client.clone())
//!         .task(Task::text("Name three Rust web frameworks"))
//!         .termination(stop_on_finish())
//!         .on_output(record_text("frameworks"))
//!         .build()?;
//!     let reviewer = Agent::builder("Reviewer")
//!         .config(&config.agent)
//!         .client(client)
//!         .task(Task::text("Pick the best framework from memory"))
//!         .termination(stop_on_finish())
//!         .on_output(record_text("review"))
//!         .build()?;
//!
//!     let crew = writer.then(reviewer);
//!     crew.kickoff().await;
//!     println!("{}", crew.render().await);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;

// Re-export commonly used items
pub use agent::{sequential, Agent, MemoryStore, SequentialPipeline, TaskOutcome};
pub use core::{Config, CrewError, Result};
pub use llm::{GeminiClient, ModelClient};
