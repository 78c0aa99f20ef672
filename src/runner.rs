use std::time::Duration;
use std::time::Instant;

use flume::SendError;
use flume::Sender;
use thiserror::Error;
use tracing::debug;
use tracing::info_span;
use tracing::Instrument;

use crate::error::HarnessError;
use crate::harness::Harness;
use crate::transport::Transport;
use crate::validator::Case;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("channel error")]
    ChannelError(#[from] SendError<CaseResult>),
}

#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub method: String,
    pub path: String,
    pub elapsed: Duration,
    pub outcome: Result<u16, HarnessError>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs the cases one after another and streams each result to `tx`.
pub async fn run_cases<T: Transport>(
    cases: Vec<Case>,
    harness: &Harness<T>,
    tx: Sender<CaseResult>,
) -> Result<(), RunnerError> {
    for case in cases {
        let span = info_span!("case", name = %case.name);
        let result = run_case(case, harness).instrument(span).await;

        tx.send_async(result).await?;
    }

    Ok(())
}

async fn run_case<T: Transport>(case: Case, harness: &Harness<T>) -> CaseResult {
    let started = Instant::now();
    let outcome = harness
        .run(&case.spec, &case.assertion)
        .await
        .map(|response| response.status.as_u16());
    let elapsed = started.elapsed();

    if let Err(error) = &outcome {
        debug!(%error, "case failed");
    }

    CaseResult {
        name: case.name,
        method: case.spec.method.to_string(),
        path: case.spec.url.path().to_string(),
        elapsed,
        outcome,
    }
}
