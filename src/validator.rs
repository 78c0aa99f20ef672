use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use miette::Diagnostic;
use miette::NamedSource;
use miette::SourceSpan;
use reqwest::Method;
use reqwest::Url;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use thiserror::Error;
use toml::Value;

use crate::asserter::ResponseAssertion;
use crate::json_path::JsonPath;
use crate::matcher::JsonType;
use crate::matcher::Matcher;
use crate::parser;
use crate::parser::Quest;
use crate::request::APPLICATION_JSON;
use crate::request::RequestSpec;

// Error messages for parsing URLs
const BASE_URL_ENDS_WITH: &str =
    "The base URL from setup can't end with a /, and each URL in test must start with one";
const PATH_URL_MISSING_SLASH: &str =
    "The URL field in a test is required to begin with a leading /.";

const CHECK_KEYS: [&str; 6] = [
    "assert_fields",
    "assert_types",
    "assert_field_contains",
    "assert_body_contains",
    "assert_headers",
    "assert_fixture",
];

pub struct Validator {
    quest: Quest,
    toml_src: String,
    file_name: String,
    base_url: Option<String>,
}

/// A test case ready to be handed to the harness.
#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub spec: RequestSpec,
    pub assertion: ResponseAssertion,
}

pub struct SuiteSetup {
    pub base_url: String,
    pub fixtures_dir: PathBuf,
    pub timeout: Option<Duration>,
}

pub struct IR {
    pub setup: SuiteSetup,
    pub cases: Vec<Case>,
}

#[derive(Debug, Error, Diagnostic)]
#[error("Invalid field `{field}`: {message}")]
pub struct ValidationError {
    field: String,
    message: String,
    #[source_code]
    src: Option<NamedSource<String>>,
    #[label("invalid value here")]
    span: Option<SourceSpan>,
}

impl ValidationError {
    pub fn field(&self) -> &str {
        &self.field
    }
}

macro_rules! validation_err {
    ($field:expr, $msg:expr, $self:expr, $snippet:expr) => {
        ValidationError {
            field: $field.to_string(),
            message: $msg.to_string(),
            src: Some(NamedSource::new(
                $self.file_name.clone(),
                $self.toml_src.clone(),
            )),
            span: find_span($snippet, &$self.toml_src),
        }
    };
}

impl Validator {
    pub fn new(quest: &Quest, toml_src: &str, file_name: &str) -> Self {
        Self {
            quest: quest.clone(),
            toml_src: toml_src.into(),
            file_name: file_name.into(),
            base_url: None,
        }
    }

    /// Replaces `setup.base_url`, e.g. to point the suite at a local stub.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn validate(&self) -> miette::Result<IR, ValidationError> {
        let setup = self.validate_setup()?;
        let global_headers = match &self.quest.setup.headers {
            Some(value) => self.parse_header_map("setup.headers", value)?,
            None => HeaderMap::new(),
        };

        let cases = self
            .quest
            .tests
            .iter()
            .map(|test| self.create_case(test, &setup.base_url, &global_headers))
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(IR { setup, cases })
    }

    fn validate_setup(&self) -> Result<SuiteSetup, ValidationError> {
        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| self.quest.setup.base_url.clone());

        if base_url.ends_with('/') {
            return Err(validation_err!(
                "setup.base_url",
                BASE_URL_ENDS_WITH,
                self,
                &base_url
            ));
        }

        let suite_dir = Path::new(&self.file_name)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let fixtures_dir = match &self.quest.setup.fixtures_dir {
            Some(dir) => suite_dir.join(dir),
            None => suite_dir,
        };

        Ok(SuiteSetup {
            base_url,
            fixtures_dir,
            timeout: self.quest.setup.timeout_secs.map(Duration::from_secs),
        })
    }

    fn create_case(
        &self,
        test: &parser::Test,
        base_url: &str,
        global_headers: &HeaderMap,
    ) -> Result<Case, ValidationError> {
        let method = parse_method(&test.method.to_uppercase()).map_err(|e| {
            validation_err!(format!("{} - method", test.name), e, self, &test.method)
        })?;

        let url = parse_url(base_url, &test.url).map_err(|e| match e {
            ParseUrlError::PathUrlMissingSlash => validation_err!(
                format!("{}/url", test.name),
                PATH_URL_MISSING_SLASH,
                self,
                &test.url
            ),
            ParseUrlError::ParseIntoUrlFailed(parse_error) => validation_err!(
                format!("{}/url", test.name),
                parse_error.to_string(),
                self,
                &test.url
            ),
        })?;

        let mut spec = RequestSpec::new(method, url);

        for (key, value) in test.query.iter().flatten() {
            let value = scalar_to_string(value).ok_or_else(|| {
                validation_err!(
                    format!("{}/query", test.name),
                    format!("Query value for `{key}` must be a string, number or boolean"),
                    self,
                    key
                )
            })?;
            spec = spec.query(key, value);
        }

        // Global headers first, test headers override on conflict
        spec.headers = global_headers.clone();
        if let Some(value) = &test.headers {
            let test_headers = self.parse_header_map(&format!("{}/headers", test.name), value)?;
            for (key, value) in test_headers {
                if let Some(key) = key {
                    spec.headers.insert(key, value);
                }
            }
        }

        spec.content_type = test.content_type.clone();
        if let Some(body) = &test.body {
            spec.body = Some(body.clone());
            if spec.content_type.is_none() {
                spec.content_type = Some(APPLICATION_JSON.into());
            }
        }

        let assertion = self.create_assertion(test)?;

        Ok(Case {
            name: test.name.clone(),
            spec,
            assertion,
        })
    }

    fn create_assertion(&self, test: &parser::Test) -> Result<ResponseAssertion, ValidationError> {
        if !(100..=599).contains(&test.assert_status) {
            return Err(validation_err!(
                format!("{}/assert_status", test.name),
                format!("{} is not an HTTP status code", test.assert_status),
                self,
                &test.assert_status.to_string()
            ));
        }

        let mut assertion = ResponseAssertion::status(test.assert_status);

        for (key, value) in &test.checks {
            let field = format!("{}/{key}", test.name);

            match key.as_str() {
                "assert_fields" => {
                    for (path, expected) in self.table(&field, value)? {
                        self.check_path(&test.name, path)?;
                        let expected = serde_json::to_value(expected).map_err(|e| {
                            validation_err!(&field, e, self, path)
                        })?;
                        assertion = assertion.field(path, Matcher::Equals(expected));
                    }
                }
                "assert_types" => {
                    for (path, kind) in self.table(&field, value)? {
                        self.check_path(&test.name, path)?;
                        let kind = self.string(&field, kind)?;
                        let kind = JsonType::from_str(kind)
                            .map_err(|e| validation_err!(&field, e, self, kind))?;
                        assertion = assertion.field(path, Matcher::IsType(kind));
                    }
                }
                "assert_field_contains" => {
                    for (path, needle) in self.table(&field, value)? {
                        self.check_path(&test.name, path)?;
                        let needle = self.string(&field, needle)?;
                        assertion = assertion.field(path, Matcher::contains(needle));
                    }
                }
                "assert_body_contains" => {
                    assertion = assertion.body_contains(self.string(&field, value)?);
                }
                "assert_headers" => {
                    for (name, value) in self.parse_header_map(&field, value)? {
                        if let Some(name) = name {
                            assertion = assertion.header(name, value);
                        }
                    }
                }
                "assert_fixture" => {
                    assertion = assertion.fixture(self.string(&field, value)?);
                }
                _ => {
                    return Err(validation_err!(
                        field,
                        format!("Unknown key, expected one of {}", CHECK_KEYS.join(", ")),
                        self,
                        key
                    ));
                }
            }
        }

        Ok(assertion)
    }

    fn table<'a>(&self, field: &str, value: &'a Value) -> Result<&'a toml::Table, ValidationError> {
        value.as_table().ok_or_else(|| {
            validation_err!(field, format!("Expected a table, got {value}"), self, field)
        })
    }

    fn string<'a>(&self, field: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
        value.as_str().ok_or_else(|| {
            validation_err!(field, format!("Expected a string, got {value}"), self, field)
        })
    }

    fn check_path(&self, test_name: &str, path: &str) -> Result<(), ValidationError> {
        JsonPath::parse(path)
            .map(|_| ())
            .map_err(|e| validation_err!(format!("{test_name}/{path}"), e, self, path))
    }

    /// Parses a TOML table of header names to string values.
    fn parse_header_map(&self, field: &str, value: &Value) -> Result<HeaderMap, ValidationError> {
        let map = value.as_table().ok_or_else(|| {
            validation_err!(
                field,
                format!("Expected a table for headers, got {value:?}"),
                self,
                field
            )
        })?;

        let mut header_map = HeaderMap::new();

        for (key, value) in map {
            let v_str = value.as_str().ok_or_else(|| {
                validation_err!(
                    key,
                    format!("Header value must be a string, got {value:?}"),
                    self,
                    key
                )
            })?;

            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                validation_err!(key, format!("Invalid header name `{key}`: {e}"), self, key)
            })?;

            let h_value = HeaderValue::from_str(v_str).map_err(|e| {
                validation_err!(
                    key,
                    format!("Invalid header value for `{key}`: {e}"),
                    self,
                    v_str
                )
            })?;

            header_map.insert(name, h_value);
        }

        Ok(header_map)
    }
}

#[derive(Debug, Error)]
enum ParseUrlError {
    #[error("")]
    PathUrlMissingSlash,
    #[error("Failed to parse URL: {0}")]
    ParseIntoUrlFailed(#[from] url::ParseError),
}

fn parse_url(base_url: &str, path_url: &str) -> Result<Url, ParseUrlError> {
    if !path_url.starts_with('/') {
        return Err(ParseUrlError::PathUrlMissingSlash);
    }

    let url = Url::parse(&format!("{base_url}{path_url}"))?;

    Ok(url)
}

fn parse_method(method: &str) -> Result<Method, String> {
    let method = Method::from_str(method).map_err(|e| e.to_string())?;

    if !matches!(
        method,
        Method::GET
            | Method::POST
            | Method::PUT
            | Method::DELETE
            | Method::PATCH
            | Method::HEAD
            | Method::OPTIONS
    ) {
        return Err(format!("Invalid HTTP method: {}", method));
    }

    Ok(method)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Quoted occurrences first, so `"2"` is found before an unrelated bare `2`.
fn find_span(needle: &str, toml_src: &str) -> Option<SourceSpan> {
    let quoted = format!("\"{}\"", needle);
    toml_src
        .find(&quoted)
        .map(|start| SourceSpan::new((start + 1).into(), needle.len()))
        .or_else(|| {
            toml_src
                .find(needle)
                .map(|start| SourceSpan::new(start.into(), needle.len()))
        })
}
