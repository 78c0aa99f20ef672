use std::path::Path;
use std::path::PathBuf;

use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;

use crate::error::AssertionFailure;
use crate::fixture;
use crate::json_path::JsonPath;
use crate::matcher::Matcher;
use crate::response::CapturedResponse;

/// A single check on a received response.
#[derive(Debug, Clone)]
pub enum Assertion {
    Field { path: String, matcher: Matcher },
    BodyContains(String),
    Header { name: HeaderName, value: HeaderValue },
    Fixture(PathBuf),
}

/// Expected status plus the checks to run, in order, once the status matched.
#[derive(Debug, Clone)]
pub struct ResponseAssertion {
    pub status: u16,
    pub checks: Vec<Assertion>,
}

impl ResponseAssertion {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            checks: vec![],
        }
    }

    pub fn field(mut self, path: impl Into<String>, matcher: Matcher) -> Self {
        self.checks.push(Assertion::Field {
            path: path.into(),
            matcher,
        });
        self
    }

    pub fn body_contains(mut self, needle: impl Into<String>) -> Self {
        self.checks.push(Assertion::BodyContains(needle.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.checks.push(Assertion::Header { name, value });
        self
    }

    pub fn fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.checks.push(Assertion::Fixture(path.into()));
        self
    }
}

pub trait Assert {
    /// Runs every check and stops at the first one that fails.
    fn assert(
        &self,
        assertion: &ResponseAssertion,
        fixtures_dir: Option<&Path>,
    ) -> Result<(), AssertionFailure>;
}

impl Assert for CapturedResponse {
    fn assert(
        &self,
        assertion: &ResponseAssertion,
        fixtures_dir: Option<&Path>,
    ) -> Result<(), AssertionFailure> {
        assert_status(self, assertion.status)?;

        assertion.checks.iter().try_for_each(|check| match check {
            Assertion::Field { path, matcher } => assert_field(self, path, matcher),
            Assertion::BodyContains(needle) => assert_body_contains(self, needle),
            Assertion::Header { name, value } => assert_header(self, name, value),
            Assertion::Fixture(path) => {
                assert_body_equals_fixture(self, &fixture::resolve(fixtures_dir, path))
            }
        })
    }
}

pub fn assert_status(response: &CapturedResponse, expected: u16) -> Result<(), AssertionFailure> {
    let actual = response.status.as_u16();
    if actual != expected {
        return Err(AssertionFailure::Status { expected, actual });
    }

    Ok(())
}

pub fn assert_field(
    response: &CapturedResponse,
    path: &str,
    matcher: &Matcher,
) -> Result<(), AssertionFailure> {
    let json_path = JsonPath::parse(path).map_err(|e| AssertionFailure::InvalidPath {
        path: path.into(),
        reason: e.to_string(),
    })?;

    let Some(body) = &response.body_json else {
        return Err(AssertionFailure::NotJson { path: path.into() });
    };

    let actual = json_path.resolve(body);
    if actual.as_ref().is_some_and(|value| matcher.matches(value)) {
        return Ok(());
    }

    Err(AssertionFailure::Field {
        path: json_path.to_string(),
        expected: matcher.to_string(),
        actual,
    })
}

pub fn assert_body_contains(
    response: &CapturedResponse,
    needle: &str,
) -> Result<(), AssertionFailure> {
    let body = response.body_text();
    if body.contains(needle) {
        return Ok(());
    }

    Err(AssertionFailure::BodyContains {
        needle: needle.into(),
        body,
    })
}

pub fn assert_header(
    response: &CapturedResponse,
    name: &HeaderName,
    expected: &HeaderValue,
) -> Result<(), AssertionFailure> {
    let actual = response.headers.get(name);
    if actual.is_some_and(|value| value.as_bytes() == expected.as_bytes()) {
        return Ok(());
    }

    Err(AssertionFailure::Header {
        name: name.to_string(),
        expected: expected.to_str().unwrap_or("<invalid utf8>").into(),
        actual: actual.map(|v| v.to_str().unwrap_or("<invalid utf8>").to_string()),
    })
}

pub fn assert_body_equals_fixture(
    response: &CapturedResponse,
    fixture_path: &Path,
) -> Result<(), AssertionFailure> {
    let expected = fixture::load(fixture_path)?;

    let Some(actual) = &response.body_json else {
        return Err(AssertionFailure::Fixture {
            fixture: fixture_path.to_path_buf(),
            difference: "response body is not JSON".into(),
        });
    };

    fixture::compare(actual, &expected).map_err(|difference| AssertionFailure::Fixture {
        fixture: fixture_path.to_path_buf(),
        difference,
    })
}
