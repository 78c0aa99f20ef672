//! Dot/bracket addressing into a parsed JSON document.
//!
//! `data[0].email`, `support.url`, `["first name"]`, and the empty path (or
//! `$`) for the whole document. Paths are rewritten into bracket-quoted
//! JSONPath (`$['data'][0]['email']`) and evaluated with `jsonpath_lib`.

use std::fmt;
use std::str::FromStr;

use jsonpath_lib::select;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    expression: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty segment at position {0}")]
    EmptySegment(usize),

    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),

    #[error("unexpected character `{1}` at position {0}")]
    UnexpectedChar(usize, char),

    #[error("invalid path: {0}")]
    Syntax(String),
}

impl JsonPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let expression = to_expression(raw)?;

        // Compile once against an empty document to surface bracket errors early
        select(&Value::Null, &expression).map_err(|e| {
            PathError::Syntax(e.to_string().split_whitespace().collect::<Vec<_>>().join(" "))
        })?;

        Ok(Self {
            raw: raw.into(),
            expression,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The JSONPath handed to `jsonpath_lib`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns `None` when nothing in `document` lives at this path.
    ///
    /// A bracket that selects several values (`data[*].id`) yields them as an
    /// array, in document order.
    pub fn resolve(&self, document: &Value) -> Option<Value> {
        let mut matches = select(document, &self.expression).ok()?;

        match matches.len() {
            0 => None,
            1 => matches.pop().cloned(),
            _ => Some(Value::Array(matches.into_iter().cloned().collect())),
        }
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, "$")
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

/// Rewrites dotted keys as quoted brackets and passes brackets through.
///
/// `$` is the document root only on its own or before `.`/`[`; in `$ref` it is
/// part of the key.
fn to_expression(raw: &str) -> Result<String, PathError> {
    let (rest, offset) = if raw.is_empty() || raw == "$" {
        return Ok("$".into());
    } else if let Some(rest) = raw.strip_prefix("$.") {
        (rest, 2)
    } else if raw.starts_with("$[") {
        (&raw[1..], 1)
    } else {
        (raw, 0)
    };

    let bytes = rest.as_bytes();
    let mut expression = String::from("$");
    let mut need_key = offset == 2;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                if need_key {
                    return Err(PathError::EmptySegment(i + offset));
                }
                let close = find_close(rest, i).ok_or(PathError::UnclosedBracket(i + offset))?;
                expression.push_str(&rest[i..=close]);
                i = close + 1;

                if let Some(c) = rest[i..].chars().next().filter(|c| !matches!(c, '.' | '[')) {
                    return Err(PathError::UnexpectedChar(i + offset, c));
                }
            }
            b'.' => {
                if need_key || i == 0 {
                    return Err(PathError::EmptySegment(i + offset));
                }
                need_key = true;
                i += 1;
            }
            b']' => return Err(PathError::UnexpectedChar(i + offset, ']')),
            _ => {
                let end = rest[i..]
                    .find(['.', '[', ']'])
                    .map_or(rest.len(), |n| i + n);
                push_key(&mut expression, &rest[i..end]);
                need_key = false;
                i = end;
            }
        }
    }

    if need_key {
        return Err(PathError::EmptySegment(rest.len() + offset));
    }

    Ok(expression)
}

fn push_key(expression: &mut String, key: &str) {
    expression.push_str("['");
    expression.push_str(&key.replace('\'', "\\'"));
    expression.push_str("']");
}

fn find_close(path: &str, open: usize) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (idx, c) in path.char_indices().skip_while(|(idx, _)| *idx <= open) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, ']') => return Some(idx),
            _ => {}
        }
    }

    None
}
