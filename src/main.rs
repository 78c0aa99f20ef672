#![allow(clippy::result_large_err)]

use clap::Parser;
use miette::Diagnostic;
use miette::Result;
use restquest::harness::Harness;
use restquest::outputter::OutPutter;
use restquest::outputter::Summary;
use restquest::parser::Quest;
use restquest::runner::CaseResult;
use restquest::runner::RunnerError;
use restquest::runner::run_cases;
use restquest::transport::ReqwestTransport;
use restquest::validator::IR;
use restquest::validator::ValidationError;
use restquest::validator::Validator;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

mod cli;

#[derive(Error, Debug, Diagnostic)]
pub enum QuestError {
    #[error("Failed to read toml file")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse toml file")]
    TomlParsing(#[from] toml::de::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ValidationError(#[from] ValidationError),

    #[error("Failed to set up the HTTP client: {0}")]
    ClientError(#[from] restquest::TransportFailure),

    #[error("Test pipeline stopped early: {0}")]
    PipelineError(String),

    #[error("{failed} of {total} tests failed")]
    #[diagnostic(help("run with --verbose to log every request and response"))]
    TestsFailed { failed: usize, total: usize },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "restquest=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Reads the suite file and validates it into runnable cases.
fn load_and_validate_config(cli: &Cli) -> Result<IR, QuestError> {
    let contents = std::fs::read_to_string(&cli.path).map_err(QuestError::FileError)?;
    let quest: Quest = toml::from_str(&contents).map_err(QuestError::TomlParsing)?;

    let ir = Validator::new(&quest, contents.as_str(), cli.path.as_str())
        .with_base_url(cli.base_url.clone())
        .validate()
        .map_err(QuestError::ValidationError)?;

    Ok(ir)
}

/// Runs the cases and prints their results as they arrive.
///
/// The runner executes one case at a time and streams each result over a
/// flume channel to the outputter task.
async fn run_pipeline(ir: IR, path: &str) -> Result<Summary, QuestError> {
    let IR { setup, cases } = ir;
    let n_tests = cases.len();

    let transport = match setup.timeout {
        Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
        None => ReqwestTransport::new(),
    };
    let harness = Harness::new(transport).with_fixtures_dir(setup.fixtures_dir);

    let (runner_tx, outputter_rx) = flume::unbounded::<CaseResult>();

    let outputter_path = path.to_owned();
    let outputter_handle = tokio::spawn(async move {
        OutPutter::start(outputter_rx, &outputter_path, n_tests).await
    });

    let (runner_result, outputter_result) =
        futures::join!(run_cases(cases, &harness, runner_tx), outputter_handle);

    runner_result.map_err(|e: RunnerError| QuestError::PipelineError(e.to_string()))?;
    outputter_result.map_err(|e| QuestError::PipelineError(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ir = load_and_validate_config(&cli)?;
    let summary = run_pipeline(ir, &cli.path).await?;

    if !summary.all_passed() {
        return Err(QuestError::TestsFailed {
            failed: summary.failed,
            total: summary.passed + summary.failed,
        }
        .into());
    }

    Ok(())
}
