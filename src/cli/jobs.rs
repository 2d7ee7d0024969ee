//! Job-search crew
//!
//! Two agents: a categorizer that reads a CV and proposes job categories,
//! and a searcher that looks for openings in those categories.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::hooks::{
    log_tool_call, record_categories, record_text, stop_on_finish, JOBS_SECTION,
    JOB_CATEGORIES_SECTION,
};
use crate::agent::Agent;
use crate::core::config::AgentConfig;
use crate::core::{
    CrewError, FunctionDeclaration, GenerationConfig, Part, Result, Task, ToolSpec,
};
use crate::llm::ModelClient;

pub const CATEGORIZER_NAME: &str = "JobCategorizerAgent";
pub const SEARCHER_NAME: &str = "JobSearchAgent";

const CATEGORIZER_SCRATCHPAD: &str = "You are a job search assistant categorizing jobs.";
const CATEGORIZER_PROMPT: &str =
    "Review my CV and provide the list of jobs that match my profile";

const SEARCHER_SCRATCHPAD: &str = "Find job listings matching user profile.";
const SEARCHER_PROMPT: &str = "Extract job categories from memory and search online for job openings. \
     For each job, provide title, company, location, description, salary, and application link.";

/// A job category proposed for the CV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCategory {
    pub title: String,
    pub description: String,
}

impl JobCategory {
    /// Response schema for a list of categories
    pub fn list_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": {"type": "STRING"},
                    "description": {"type": "STRING"}
                },
                "required": ["title", "description"]
            }
        })
    }
}

fn job_board(name: &str, description: &str) -> FunctionDeclaration {
    FunctionDeclaration::new(
        name,
        description,
        json!({
            "type": "OBJECT",
            "properties": {
                "job_title": {"type": "STRING"}
            }
        }),
    )
}

/// Job board lookups the searcher may request. Calls are logged only.
pub fn job_board_tools() -> ToolSpec {
    ToolSpec::Functions(vec![
        job_board(
            "get_jobs_posts_from_linkedIn",
            "Return job posts from LinkedIn.",
        ),
        job_board(
            "get_jobs_posts_from_glassdoor",
            "Return job posts from Glassdoor.",
        ),
    ])
}

/// Read the CV as a PDF attachment
pub fn load_cv(path: &Path) -> Result<Part> {
    let data = fs::read(path).map_err(|e| {
        CrewError::config(format!("Failed to read CV at {}: {}", path.display(), e))
    })?;
    Ok(Part::bytes("application/pdf", data))
}

/// Agent that turns a CV into job categories under `job-categories`
pub fn categorizer(
    client: Arc<dyn ModelClient>,
    config: &AgentConfig,
    cv: Part,
) -> Result<Agent> {
    Agent::builder(CATEGORIZER_NAME)
        .config(config)
        .client(client)
        .scratchpad(CATEGORIZER_SCRATCHPAD)
        .task(Task::new(vec![cv]).with_part(CATEGORIZER_PROMPT))
        .generation(GenerationConfig::json(JobCategory::list_schema()))
        .termination(stop_on_finish())
        .on_tool_call(log_tool_call())
        .on_output(record_categories(JOB_CATEGORIES_SECTION))
        .build()
}

/// Agent that searches for openings and stores raw results under `jobs`.
///
/// Searches with Google Search, or with the job board lookups when
/// `job_boards` is set. Gemini rejects requests that combine search
/// grounding with function declarations, so the two are never sent together.
pub fn searcher(
    client: Arc<dyn ModelClient>,
    config: &AgentConfig,
    job_boards: bool,
) -> Result<Agent> {
    let tool = if job_boards {
        job_board_tools()
    } else {
        ToolSpec::GoogleSearch
    };
    let generation = GenerationConfig::default()
        .with_modalities(&["TEXT"])
        .with_tool(tool);

    Agent::builder(SEARCHER_NAME)
        .config(config)
        .client(client)
        .scratchpad(SEARCHER_SCRATCHPAD)
        .task(Task::text(SEARCHER_PROMPT))
        .generation(generation)
        .termination(stop_on_finish())
        .on_tool_call(log_tool_call())
        .on_output(record_text(JOBS_SECTION))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::sequential;
    use crate::core::{FinishReason, ToolCall};
    use crate::llm::{ModelResponse, ScriptedClient};

    fn fast_config() -> AgentConfig {
        AgentConfig {
            model: "gemini-2.0-flash-001".to_string(),
            max_iterations: 5,
            retry_attempts: 1,
            retry_delay_ms: 0,
        }
    }

    #[test]
    fn test_schema_matches_category_shape() {
        let schema = JobCategory::list_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"], json!(["title", "description"]));

        let parsed: Vec<JobCategory> = serde_json::from_value(json!([
            {"title": "Backend Developer", "description": "APIs"}
        ]))
        .unwrap();
        assert_eq!(parsed[0].title, "Backend Developer");
    }

    #[test]
    fn test_load_cv_missing_file() {
        let err = load_cv(Path::new("/nonexistent/CV.pdf")).unwrap_err();
        assert!(err.to_string().contains("CV.pdf"));
    }

    #[test]
    fn test_load_cv() {
        let path =
            std::env::temp_dir().join(format!("verbal-crew-cv-{}.pdf", std::process::id()));
        fs::write(&path, b"%PDF-1.4").unwrap();

        let part = load_cv(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(part, Part::bytes("application/pdf", b"%PDF-1.4".to_vec()));
    }

    #[test]
    fn test_searcher_tools() {
        let client: Arc<dyn ModelClient> = Arc::new(ScriptedClient::new(vec![]));
        let config = fast_config();

        let search = searcher(Arc::clone(&client), &config, false).unwrap();
        assert_eq!(search.generation().tools, vec![ToolSpec::GoogleSearch]);

        let boards = searcher(client, &config, true).unwrap();
        assert_eq!(boards.generation().tools, vec![job_board_tools()]);
        assert!(!boards.generation().tools.contains(&ToolSpec::GoogleSearch));
    }

    #[tokio::test]
    async fn test_job_search_crew() {
        let categorizer_client = Arc::new(ScriptedClient::responses(vec![ModelResponse::parsed(
            json!([
                {"title": "Backend Developer", "description": "APIs"},
                {"title": "Platform Engineer", "description": "Infra"}
            ]),
        )]));
        let searcher_client = Arc::new(ScriptedClient::responses(vec![
            ModelResponse::tool_calls(vec![ToolCall::new(
                "get_jobs_posts_from_linkedIn",
                json!({"job_title": "Backend Developer"}),
            )])
            .with_finish_reason(Some(FinishReason::Other("FINISH_REASON_UNSPECIFIED".into()))),
            ModelResponse::text("Backend Developer - Acme - Berlin"),
        ]));

        let config = fast_config();
        let cv = Part::bytes("application/pdf", b"%PDF".to_vec());
        let pipeline = sequential(vec![
            categorizer(categorizer_client, &config, cv).unwrap(),
            searcher(searcher_client.clone(), &config, true).unwrap(),
        ]);

        let report = pipeline.kickoff().await;

        assert!(report.all_terminated());
        assert_eq!(searcher_client.calls(), 2);
        assert_eq!(
            pipeline.render().await,
            "job-categories\n\nBackend Developer\nPlatform Engineer\n\n\
             jobs\n\nBackend Developer - Acme - Berlin"
        );
    }
}
