//! Agent execution loop
//!
//! One agent type; its domain behavior comes from the hooks it is built with.

use std::sync::Arc;

use tracing::{error, info};

use crate::agent::hooks::{
    ignore_output, log_tool_call, OutputHook, TerminationPredicate, ToolCallHook,
};
use crate::agent::loop_state::{AgentLoopState, TaskOutcome};
use crate::agent::memory::{MemoryStore, SharedMemory};
use crate::agent::pipeline::SequentialPipeline;
use crate::core::config::AgentConfig;
use crate::core::{CrewError, GenerationConfig, Result, Task};
use crate::llm::{call_with_retry, GenerateRequest, ModelClient, ModelResponse, RetryPolicy};

/// A model-backed agent running a bounded call/act loop
#[derive(Clone)]
pub struct Agent {
    /// Name of this agent
    name: String,
    /// Model identifier
    model: String,
    /// System instructions sent with every call
    scratchpad: String,
    /// Iteration budget per task
    max_iterations: usize,
    /// Success exit; without one the loop always runs to exhaustion
    termination: Option<TerminationPredicate>,
    /// Model client
    client: Arc<dyn ModelClient>,
    /// Payload sent on every iteration
    task: Task,
    /// Generation parameters and declared tools
    generation: GenerationConfig,
    /// Retry behavior for a single model call
    retry: RetryPolicy,
    on_tool_call: ToolCallHook,
    on_output: OutputHook,
    /// Private until the agent joins a pipeline
    memory: SharedMemory,
}

/// Builder for creating Agents
pub struct AgentBuilder {
    name: String,
    model: String,
    scratchpad: String,
    max_iterations: usize,
    termination: Option<TerminationPredicate>,
    client: Option<Arc<dyn ModelClient>>,
    task: Task,
    generation: GenerationConfig,
    retry: RetryPolicy,
    on_tool_call: ToolCallHook,
    on_output: OutputHook,
}

impl AgentBuilder {
    /// Create a new builder with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let defaults = AgentConfig::default();

        Self {
            name: name.into(),
            model: defaults.model.clone(),
            scratchpad: String::new(),
            max_iterations: defaults.max_iterations,
            termination: None,
            client: None,
            task: Task::default(),
            generation: GenerationConfig::default(),
            retry: defaults.retry_policy(),
            on_tool_call: log_tool_call(),
            on_output: ignore_output(),
        }
    }

    /// Take model, iteration budget and retry policy from configuration
    pub fn config(mut self, config: &AgentConfig) -> Self {
        self.model = config.model.clone();
        self.max_iterations = config.max_iterations;
        self.retry = config.retry_policy();
        self
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system instructions
    pub fn scratchpad(mut self, scratchpad: impl Into<String>) -> Self {
        self.scratchpad = scratchpad.into();
        self
    }

    /// Set the iteration budget
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the termination predicate
    pub fn termination(mut self, predicate: TerminationPredicate) -> Self {
        self.termination = Some(predicate);
        self
    }

    /// Set the model client
    pub fn client(mut self, client: Arc<dyn ModelClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the task payload
    pub fn task(mut self, task: Task) -> Self {
        self.task = task;
        self
    }

    /// Set generation parameters
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the tool call hook
    pub fn on_tool_call(mut self, hook: ToolCallHook) -> Self {
        self.on_tool_call = hook;
        self
    }

    /// Set the output hook
    pub fn on_output(mut self, hook: OutputHook) -> Self {
        self.on_output = hook;
        self
    }

    /// Build the Agent
    pub fn build(self) -> Result<Agent> {
        let client = self
            .client
            .ok_or_else(|| CrewError::config(format!("agent '{}' has no model client", self.name)))?;

        Ok(Agent {
            name: self.name,
            model: self.model,
            scratchpad: self.scratchpad,
            max_iterations: self.max_iterations,
            termination: self.termination,
            client,
            task: self.task,
            generation: self.generation,
            retry: self.retry,
            on_tool_call: self.on_tool_call,
            on_output: self.on_output,
            memory: MemoryStore::shared(),
        })
    }
}

impl Agent {
    /// Create a builder
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    /// Get the name of this agent
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the iteration budget
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Generation parameters and declared tools
    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Handle to the memory this agent writes to
    pub fn memory(&self) -> SharedMemory {
        Arc::clone(&self.memory)
    }

    /// Replace this agent's memory with a shared one
    pub fn join(&mut self, memory: SharedMemory) {
        self.memory = memory;
    }

    /// Chain two agents into a sequential pipeline
    pub fn then(self, next: Agent) -> SequentialPipeline {
        SequentialPipeline::new(vec![self, next])
    }

    /// Invoke the model with the task payload and context, retrying
    /// transient failures.
    pub async fn call_llm(&self, context: &str) -> Result<ModelResponse> {
        let request = GenerateRequest::new(
            &self.model,
            Some(self.scratchpad.as_str()),
            &self.task.parts,
            context,
            &self.generation,
        );

        call_with_retry(self.client.as_ref(), &request, self.retry).await
    }

    /// Run the iteration loop for one task.
    ///
    /// Never returns an error: failures end the loop and are reported in the
    /// outcome.
    pub async fn start_task(&self, context: &str) -> TaskOutcome {
        info!("[{}] is working...", self.name);
        let mut state = AgentLoopState::new(self.max_iterations);

        while state.should_continue() {
            state.next_iteration();
            match self.iterate(context).await {
                Ok(true) => state.terminate(),
                Ok(false) => {}
                Err(e) => {
                    error!("[{}] Error: {}", self.name, e);
                    state.fail(e);
                }
            }
        }

        let outcome = state.into_outcome();
        info!("[{}] {}", self.name, outcome);
        outcome
    }

    /// Run standalone, using the current contents of this agent's memory as
    /// context
    pub async fn run(&self) -> TaskOutcome {
        let context = self.memory.read().await.render();
        self.start_task(&context).await
    }

    /// One cycle: call, dispatch to tools or output, check termination
    async fn iterate(&self, context: &str) -> Result<bool> {
        let response = self.call_llm(context).await?;

        if response.has_tool_calls() {
            for call in &response.tool_calls {
                (self.on_tool_call)(self.name.as_str(), call)?;
            }
        } else {
            let mut memory = self.memory.write().await;
            (self.on_output)(&response, &mut memory)?;
        }

        Ok(self
            .termination
            .as_ref()
            .is_some_and(|stop| stop(&response)))
    }
}
