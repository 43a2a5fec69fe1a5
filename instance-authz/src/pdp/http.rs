use anyhow::Context;
use async_trait::async_trait;
use instance_authz_core::http::HttpClient;
use instance_authz_core::settings::pdp::{PdpSettings, SUBSCRIPTION_KEY_HEADER};
use instance_authz_core::xacml::{XacmlJsonRequestRoot, XacmlJsonResponse};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{PdpError, PolicyDecisionPoint};

/// Policy decision point reached over HTTP with the XACML JSON profile
#[derive(Debug, Clone)]
pub struct HttpPolicyDecisionPoint {
    client: HttpClient,
    endpoint: String,
}

impl HttpPolicyDecisionPoint {
    pub fn new(settings: &PdpSettings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &settings.subscription_key {
            let mut value = HeaderValue::from_str(key.expose_secret())
                .context("Subscription key is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(SUBSCRIPTION_KEY_HEADER, value);
        }

        let client = HttpClient::builder()
            .with_timeout(Duration::from_secs(settings.timeout_seconds))
            .with_retry_config(settings.retry.clone())
            .with_default_headers(headers)
            .build()
            .context("Failed to create HTTP client for the policy decision point")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl PolicyDecisionPoint for HttpPolicyDecisionPoint {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn get_decision(
        &self,
        request: &XacmlJsonRequestRoot,
    ) -> Result<XacmlJsonResponse, PdpError> {
        let response: XacmlJsonResponse = self
            .client
            .post_json(&self.endpoint, request)
            .await
            .map_err(|err| {
                if err.is_parse_error() {
                    PdpError::MalformedResponse(err.to_string())
                } else {
                    PdpError::Request(err)
                }
            })?;
        debug!("Received {} decision results", response.results().len());
        Ok(response)
    }
}
