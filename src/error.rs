use std::path::PathBuf;

use thiserror::Error;

/// The HTTP call could not be completed.
#[derive(Error, Debug)]
pub enum TransportFailure {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to build request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    #[error("failed to serialize request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportFailure {
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return TransportFailure::Timeout { url: url.into() };
        }

        TransportFailure::Request {
            url: url.into(),
            source,
        }
    }
}

/// A response was received but failed a structural or value check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssertionFailure {
    #[error("expected status {expected}, got {actual}")]
    Status { expected: u16, actual: u16 },

    #[error("field `{path}`: expected {expected}, got {}", display_actual(.actual))]
    Field {
        path: String,
        expected: String,
        actual: Option<serde_json::Value>,
    },

    #[error("field `{path}`: response body is not JSON")]
    NotJson { path: String },

    #[error("invalid json path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("expected body to contain {needle:?}, got {body:?}")]
    BodyContains { needle: String, body: String },

    #[error("header `{name}`: expected {expected:?}, got {actual:?}")]
    Header {
        name: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("body differs from fixture {} (lhs: response, rhs: fixture):\n{difference}", .fixture.display())]
    Fixture { fixture: PathBuf, difference: String },

    #[error("could not load fixture {}: {reason}", .fixture.display())]
    FixtureUnreadable { fixture: PathBuf, reason: String },
}

fn display_actual(value: &Option<serde_json::Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<missing>".into(),
    }
}

/// Everything that can mark a single test case as failed.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}
