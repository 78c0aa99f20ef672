use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::fixture::json_eq;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown json type `{0}`, expected one of null, boolean, integer, number, string, array, object")]
pub struct UnknownJsonType(pub String);

impl FromStr for JsonType {
    type Err = UnknownJsonType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(JsonType::Null),
            "bool" | "boolean" => Ok(JsonType::Boolean),
            "int" | "integer" => Ok(JsonType::Integer),
            "number" | "float" => Ok(JsonType::Number),
            "string" => Ok(JsonType::String),
            "array" => Ok(JsonType::Array),
            "object" => Ok(JsonType::Object),
            _ => Err(UnknownJsonType(s.into())),
        }
    }
}

impl JsonType {
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (JsonType::Null, Value::Null) => true,
            (JsonType::Boolean, Value::Bool(_)) => true,
            (JsonType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (JsonType::Number, Value::Number(_)) => true,
            (JsonType::String, Value::String(_)) => true,
            (JsonType::Array, Value::Array(_)) => true,
            (JsonType::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// Predicate applied to a resolved field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    Equals(Value),
    IsType(JsonType),
    Contains(String),
}

impl Matcher {
    pub fn equals(value: impl Into<Value>) -> Self {
        Matcher::Equals(value.into())
    }

    pub fn is_type(kind: JsonType) -> Self {
        Matcher::IsType(kind)
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Matcher::Contains(needle.into())
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Equals(expected) => json_eq(expected, value),
            Matcher::IsType(kind) => kind.admits(value),
            Matcher::Contains(needle) => match value {
                Value::String(s) => s.contains(needle.as_str()),
                Value::Array(items) => items
                    .iter()
                    .any(|item| item.as_str().is_some_and(|s| s == needle.as_str())),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Equals(value) => write!(f, "{value}"),
            Matcher::IsType(kind) => write!(f, "a value of type {kind}"),
            Matcher::Contains(needle) => write!(f, "a value containing {needle:?}"),
        }
    }
}
