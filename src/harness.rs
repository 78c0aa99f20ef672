use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::asserter::Assert;
use crate::asserter::ResponseAssertion;
use crate::error::AssertionFailure;
use crate::error::HarnessError;
use crate::error::TransportFailure;
use crate::request::RequestSpec;
use crate::response::CapturedResponse;
use crate::transport::ReqwestTransport;
use crate::transport::Transport;

/// Sends requests through a [`Transport`] and checks the responses.
#[derive(Debug, Clone)]
pub struct Harness<T = ReqwestTransport> {
    transport: T,
    fixtures_dir: Option<PathBuf>,
}

impl Default for Harness<ReqwestTransport> {
    fn default() -> Self {
        Self::new(ReqwestTransport::new())
    }
}

impl<T: Transport> Harness<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            fixtures_dir: None,
        }
    }

    /// Relative fixture paths are resolved against `dir`.
    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = Some(dir.into());
        self
    }

    pub fn fixtures_dir(&self) -> Option<&Path> {
        self.fixtures_dir.as_deref()
    }

    /// Performs exactly one HTTP call.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<CapturedResponse, TransportFailure> {
        let raw = self.transport.send(spec).await?;
        Ok(CapturedResponse::from_raw(raw))
    }

    pub fn check(
        &self,
        response: &CapturedResponse,
        assertion: &ResponseAssertion,
    ) -> Result<(), AssertionFailure> {
        response.assert(assertion, self.fixtures_dir())
    }

    /// `execute` followed by `check`; the whole life of one test case.
    pub async fn run(
        &self,
        spec: &RequestSpec,
        assertion: &ResponseAssertion,
    ) -> Result<CapturedResponse, HarnessError> {
        let response = self.execute(spec).await?;
        self.check(&response, assertion)?;

        debug!(
            method = %spec.method,
            url = %spec.url,
            status = response.status.as_u16(),
            "case passed"
        );

        Ok(response)
    }
}
