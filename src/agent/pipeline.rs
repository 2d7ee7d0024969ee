//! Sequential pipeline
//!
//! Runs a fixed list of agents one after another over a single shared
//! memory. Each agent sees everything earlier agents wrote; a failed or
//! exhausted agent never stops the ones after it.

use std::sync::Arc;

use tracing::info;

use crate::agent::loop_state::TaskOutcome;
use crate::agent::memory::{MemoryStore, SharedMemory};
use crate::agent::runner::Agent;

/// Ordered agents sharing one memory store
pub struct SequentialPipeline {
    agents: Vec<Agent>,
    memory: SharedMemory,
}

/// Per-agent outcomes of one `kickoff`, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub outcomes: Vec<(String, TaskOutcome)>,
}

impl PipelineReport {
    /// Outcome of the named agent (first match)
    pub fn outcome(&self, agent: &str) -> Option<&TaskOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == agent)
            .map(|(_, outcome)| outcome)
    }

    /// Whether every agent stopped through its termination predicate
    pub fn all_terminated(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| o.is_terminated())
    }
}

/// Build a pipeline from agents in execution order
pub fn sequential(agents: impl IntoIterator<Item = Agent>) -> SequentialPipeline {
    SequentialPipeline::new(agents)
}

impl SequentialPipeline {
    /// Create the pipeline and move every agent onto its memory
    pub fn new(agents: impl IntoIterator<Item = Agent>) -> Self {
        let memory = MemoryStore::shared();
        let agents = agents
            .into_iter()
            .map(|mut agent| {
                agent.join(Arc::clone(&memory));
                agent
            })
            .collect();

        Self { agents, memory }
    }

    /// Run every agent in order
    pub async fn kickoff(&self) -> PipelineReport {
        let names: Vec<&str> = self.agents.iter().map(Agent::name).collect();
        info!("Starting crew with agents: {:?}", names);

        let mut report = PipelineReport::default();
        for agent in &self.agents {
            let context = self.render().await;
            let outcome = agent.start_task(&context).await;
            report.outcomes.push((agent.name().to_string(), outcome));
        }

        report
    }

    /// Handle to the shared memory
    pub fn memory(&self) -> SharedMemory {
        Arc::clone(&self.memory)
    }

    /// Current memory rendering
    pub async fn render(&self) -> String {
        self.memory.read().await.render()
    }

    /// Member agents in execution order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Take the agents back out (they keep the shared memory handle)
    pub fn into_agents(self) -> Vec<Agent> {
        self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::hooks::{record_text, stop_on_finish};
    use crate::core::{CrewError, Task};
    use crate::llm::{ModelResponse, RetryPolicy, ScriptedClient};

    fn agent(name: &str, client: Arc<ScriptedClient>, section: &str) -> Agent {
        Agent::builder(name)
            .client(client)
            .retry(RetryPolicy::none())
            .task(Task::text(format!("{} task", name)))
            .termination(stop_on_finish())
            .on_output(record_text(section))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_join_replaces_private_memory() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let a = agent("a", client.clone(), "x");
        a.memory().write().await.append("private", "old");

        let pipeline = sequential(vec![a, agent("b", client, "y")]);

        assert_eq!(pipeline.len(), 2);
        for member in pipeline.agents() {
            assert!(Arc::ptr_eq(&member.memory(), &pipeline.memory()));
        }
        assert!(pipeline.memory().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_later_agents_see_earlier_writes() {
        let first = Arc::new(ScriptedClient::responses(vec![ModelResponse::text("A wrote")]));
        let second = Arc::new(ScriptedClient::responses(vec![ModelResponse::text("B wrote")]));

        let pipeline = agent("A", first, "a").then(agent("B", second.clone(), "b"));
        let report = pipeline.kickoff().await;

        assert!(report.all_terminated());
        assert_eq!(second.requests()[0][0], "a\n\nA wrote");
        assert_eq!(pipeline.render().await, "a\n\nA wrote\n\nb\n\nB wrote");
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_pipeline() {
        let failing = Arc::new(ScriptedClient::new(vec![Err(CrewError::response("boom"))]));
        let healthy = Arc::new(ScriptedClient::responses(vec![ModelResponse::text("ok")]));

        let pipeline = sequential(vec![
            agent("broken", failing, "a"),
            agent("healthy", healthy.clone(), "b"),
        ]);
        let report = pipeline.kickoff().await;

        assert!(report.outcome("broken").unwrap().is_failed());
        assert!(report.outcome("healthy").unwrap().is_terminated());
        // Empty memory means no context part, only the task
        assert_eq!(healthy.requests()[0], vec!["healthy task".to_string()]);
        assert_eq!(pipeline.render().await, "b\n\nok");
    }

    #[tokio::test]
    async fn test_agents_reusable_after_run() {
        let client = Arc::new(ScriptedClient::responses(vec![ModelResponse::text("one")]));
        let pipeline = sequential(vec![agent("solo", client, "s")]);
        pipeline.kickoff().await;

        let agents = pipeline.into_agents();
        assert_eq!(agents[0].name(), "solo");
        assert_eq!(agents[0].memory().read().await.entries("s"), vec!["one"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = sequential(Vec::new());
        assert!(pipeline.is_empty());
        assert!(pipeline.kickoff().await.outcomes.is_empty());
    }
}
