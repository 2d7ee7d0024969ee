//! Agent module - execution loop, shared memory and sequential composition
//!
//! Contains the agent loop, the hook functions that give agents their
//! domain behavior, and the pipeline that chains them.

pub mod hooks;
pub mod loop_state;
pub mod memory;
pub mod pipeline;
pub mod runner;

pub use hooks::{OutputHook, TerminationPredicate, ToolCallHook};
pub use loop_state::{AgentLoopState, TaskOutcome};
pub use memory::{MemoryEntry, MemorySection, MemoryStore, SharedMemory};
pub use pipeline::{sequential, PipelineReport, SequentialPipeline};
pub use runner::{Agent, AgentBuilder};
