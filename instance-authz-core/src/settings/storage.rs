use serde::Deserialize;

use crate::http::RetryConfig;

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct StorageSettings {
    /// Base URL of the application repository, e.g. `https://platform.example/storage/api/v1`
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl StorageSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }

    pub fn applications_url(&self) -> String {
        format!("{}/applications", self.base_url.trim_end_matches('/'))
    }

    pub fn application_url(&self, org: &str, app: &str) -> String {
        format!("{}/{}/{}", self.applications_url(), org, app)
    }
}
