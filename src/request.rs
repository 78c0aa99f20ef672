use reqwest::Method;
use reqwest::Url;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Serialize;

use crate::error::TransportFailure;

pub const APPLICATION_JSON: &str = "application/json";

/// Everything needed to perform one HTTP call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub content_type: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: vec![],
            headers: HeaderMap::new(),
            content_type: None,
            body: None,
        }
    }

    pub fn get(url: &str) -> Result<Self, TransportFailure> {
        Ok(Self::new(Method::GET, parse(url)?))
    }

    pub fn post(url: &str) -> Result<Self, TransportFailure> {
        Ok(Self::new(Method::POST, parse(url)?))
    }

    pub fn put(url: &str) -> Result<Self, TransportFailure> {
        Ok(Self::new(Method::PUT, parse(url)?))
    }

    pub fn patch(url: &str) -> Result<Self, TransportFailure> {
        Ok(Self::new(Method::PATCH, parse(url)?))
    }

    pub fn delete(url: &str) -> Result<Self, TransportFailure> {
        Ok(Self::new(Method::DELETE, parse(url)?))
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Serializes `payload` as the request body and defaults the content type
    /// to `application/json`.
    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self, TransportFailure> {
        self.body = Some(serde_json::to_value(payload)?);
        if self.content_type.is_none() {
            self.content_type = Some(APPLICATION_JSON.into());
        }
        Ok(self)
    }

    /// Target URL with the query parameters appended.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }

    pub fn body_bytes(&self) -> Result<Option<Vec<u8>>, TransportFailure> {
        self.body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(TransportFailure::Body)
    }
}

fn parse(url: &str) -> Result<Url, TransportFailure> {
    Url::parse(url).map_err(|e| TransportFailure::InvalidRequest {
        url: url.into(),
        reason: e.to_string(),
    })
}
