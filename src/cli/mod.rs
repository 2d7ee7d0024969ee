//! CLI module - the job-search crew
//!
//! Wires the configured model client into the two job-search agents and
//! runs them as one pipeline.

pub mod jobs;

use std::path::Path;
use std::sync::Arc;

use crate::agent::{sequential, PipelineReport};
use crate::core::{Config, Result};
use crate::llm::{GeminiClient, ModelClient};

/// Result of one crew run
#[derive(Debug, Clone)]
pub struct CrewRun {
    pub report: PipelineReport,
    /// Final memory rendering
    pub memory: String,
}

/// Run the job-search crew against Gemini
pub async fn run_job_search(config: &Config, cv: &Path, job_boards: bool) -> Result<CrewRun> {
    let client: Arc<dyn ModelClient> = Arc::new(GeminiClient::from_config(config)?);
    run_job_search_with(client, config, cv, job_boards).await
}

/// Run the job-search crew against any model client
pub async fn run_job_search_with(
    client: Arc<dyn ModelClient>,
    config: &Config,
    cv: &Path,
    job_boards: bool,
) -> Result<CrewRun> {
    let cv = jobs::load_cv(cv)?;

    let pipeline = sequential(vec![
        jobs::categorizer(Arc::clone(&client), &config.agent, cv)?,
        jobs::searcher(client, &config.agent, job_boards)?,
    ]);

    let report = pipeline.kickoff().await;
    let memory = pipeline.render().await;

    Ok(CrewRun { report, memory })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CrewError;
    use crate::llm::{ModelResponse, ScriptedClient};
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_cv_fails_before_any_call() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let result =
            run_job_search_with(client.clone(), &Config::default(), Path::new("/nope.pdf"), false)
                .await;

        assert!(matches!(result, Err(CrewError::Config(_))));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_with_shared_client() {
        let cv = std::env::temp_dir().join(format!("verbal-crew-run-{}.pdf", std::process::id()));
        std::fs::write(&cv, b"%PDF-1.4").unwrap();

        let client = Arc::new(ScriptedClient::responses(vec![
            ModelResponse::parsed(json!([{"title": "Data Engineer", "description": "Pipelines"}])),
            ModelResponse::text("Data Engineer at Initech"),
        ]));
        let mut config = Config::default();
        config.agent.retry_attempts = 1;

        let run = run_job_search_with(client.clone(), &config, &cv, false)
            .await
            .unwrap();
        std::fs::remove_file(&cv).ok();

        assert!(run.report.all_terminated());
        assert_eq!(client.calls(), 2);
        assert_eq!(
            run.memory,
            "job-categories\n\nData Engineer\n\njobs\n\nData Engineer at Initech"
        );
        // The searcher saw the categorizer's output as context
        assert_eq!(client.requests()[1][0], "job-categories\n\nData Engineer");
    }
}
