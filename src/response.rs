use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Status, headers and body bytes as handed back by a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// A response with its body parsed once.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub body_json: Option<Value>,
}

impl CapturedResponse {
    pub fn from_raw(raw: RawResponse) -> Self {
        // An empty or non-JSON body simply has no JSON view
        let body_json = serde_json::from_slice::<Value>(&raw.body).ok();

        Self {
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            body_json,
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
