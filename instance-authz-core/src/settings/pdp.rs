use secrecy::SecretString;
use serde::Deserialize;

use crate::http::RetryConfig;

/// Header carrying the subscription key for the decision point gateway
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct PdpSettings {
    /// Full URL of the decision endpoint
    pub endpoint: String,
    pub subscription_key: Option<SecretString>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout_seconds() -> u64 {
    10
}

impl PdpSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            subscription_key: None,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = Some(SecretString::from(key.into()));
        self
    }
}
