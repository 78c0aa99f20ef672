//! A local stand-in for https://reqres.in that honours the same contract, so
//! the scenarios run without the network.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::Request;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::path_regex;
use wiremock::matchers::query_param;

pub const TOKEN: &str = "QpwL5tke4Pnpja7X4";

/// Delay used for `/api/users?delay=3`; short enough to keep the suite fast.
pub const STUB_DELAY: Duration = Duration::from_millis(300);

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

pub fn suite_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("suites/reqres.toml")
}

fn fixture(name: &str) -> Value {
    let contents = std::fs::read_to_string(fixtures_dir().join(name)).unwrap();
    serde_json::from_str(&contents).unwrap()
}

fn missing_password(request: &Request) -> Option<ResponseTemplate> {
    let body: Value = request.body_json().unwrap_or(Value::Null);

    if body.get("email").is_none() {
        return Some(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Missing email or username"})),
        );
    }

    if body.get("password").is_none() {
        return Some(ResponseTemplate::new(400).set_body_json(json!({"error": "Missing password"})));
    }

    None
}

fn echo_update(request: &Request) -> ResponseTemplate {
    let mut body: Value = request.body_json().unwrap_or_else(|_| json!({}));
    if let Value::Object(map) = &mut body {
        map.insert("updatedAt".into(), json!("2026-10-19T10:00:00.000Z"));
    }
    ResponseTemplate::new(200).set_body_json(body)
}

pub async fn reqres_stub() -> MockServer {
    init();
    let server = MockServer::start().await;

    // The live service answers an unknown user with `{}`, not an empty body
    Mock::given(method("GET"))
        .and(path("/api/users/23"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/unknown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": [
                {"id": 1, "name": "cerulean", "year": 2000, "color": "#98B2D1", "pantone_value": "15-4020"},
                {"id": 2, "name": "fuchsia rose", "year": 2001, "color": "#C74375", "pantone_value": "17-2031"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/unknown/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("user.json")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": [
                {"id": 7, "email": "michael.lawson@reqres.in", "first_name": "Michael", "last_name": "Lawson"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("delay", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixture("users.json"))
                .set_delay(STUB_DELAY),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/users/\d+$"))
        .respond_with(echo_update)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path_regex(r"^/api/users/\d+$"))
        .respond_with(echo_update)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/users/\d+$"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(|request: &Request| {
            missing_password(request).unwrap_or_else(|| {
                ResponseTemplate::new(200).set_body_json(json!({"id": 4, "token": TOKEN}))
            })
        })
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(|request: &Request| {
            missing_password(request).unwrap_or_else(|| {
                ResponseTemplate::new(200).set_body_json(json!({"token": TOKEN}))
            })
        })
        .mount(&server)
        .await;

    server
}
