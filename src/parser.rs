use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Quest {
    pub setup: Setup,
    pub tests: Vec<Test>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Setup {
    pub base_url: String,
    pub fixtures_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub headers: Option<toml::Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Test {
    pub name: String,
    pub method: String,
    pub url: String,
    pub query: Option<toml::Table>,
    pub headers: Option<toml::Value>,
    pub content_type: Option<String>,
    pub body: Option<serde_json::Value>,
    pub assert_status: u16,
    /// `assert_fields`, `assert_types`, `assert_field_contains`,
    /// `assert_body_contains`, `assert_headers` and `assert_fixture`, in the
    /// order they appear in the file.
    #[serde(flatten)]
    pub checks: toml::Table,
}
