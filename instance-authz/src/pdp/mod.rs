//! Client side of the external policy decision point (PDP).

pub mod http;

use async_trait::async_trait;
use instance_authz_core::http::RetryError;
use instance_authz_core::xacml::{XacmlJsonRequestRoot, XacmlJsonResponse};

pub use http::HttpPolicyDecisionPoint;

#[derive(Debug, thiserror::Error)]
pub enum PdpError {
    #[error("Policy decision point request failed: {0}")]
    Request(#[source] RetryError),
    #[error("Policy decision point returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl PdpError {
    /// Malformed responses are answered with a deny, everything else is a failure
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, PdpError::MalformedResponse(_))
    }
}

#[async_trait]
pub trait PolicyDecisionPoint: Send + Sync {
    /// Evaluate a (possibly batched) XACML JSON request
    async fn get_decision(
        &self,
        request: &XacmlJsonRequestRoot,
    ) -> Result<XacmlJsonResponse, PdpError>;
}
