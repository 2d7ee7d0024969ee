//! Verbal Crew - job-search crew
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use clap::Parser;
use verbal_crew::cli::run_job_search;
use verbal_crew::core::logging;
use verbal_crew::Config;

/// Verbal Crew - find jobs matching a CV with two cooperating agents
#[derive(Parser, Debug)]
#[command(name = "verbal-crew")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CV to categorize (PDF)
    #[arg(long, default_value = "CV.pdf")]
    cv: PathBuf,

    /// Gemini model for both agents
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Iteration budget per agent
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Declare the LinkedIn and Glassdoor lookups to the searcher
    #[arg(long)]
    job_boards: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(model) = args.model {
        config.agent.model = model;
    }

    if let Some(max) = args.max_iterations {
        config.agent.max_iterations = max;
    }

    if args.debug {
        config.logging.level = logging::DEBUG_LEVEL.to_string();
    }

    logging::init(&config.logging.level)?;

    let run = run_job_search(&config, &args.cv, args.job_boards).await?;

    for (agent, outcome) in &run.report.outcomes {
        println!("{}: {}", agent, outcome);
    }
    println!();
    println!("{}", run.memory);

    Ok(())
}
