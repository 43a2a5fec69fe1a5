use instance_authz_core::apps::InvalidAppId;

use crate::pdp::PdpError;

/// Failures of an authorization decision.
///
/// A denied request is not an error: decisions answer `false` or an empty
/// set. Errors are either contract violations upstream (`InvalidAppId`,
/// `MissingCaller`, `ApplicationNotFound`) or unavailable collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    #[error(transparent)]
    InvalidAppId(#[from] InvalidAppId),
    #[error("An authenticated caller is required to build a decision request")]
    MissingCaller,
    #[error("Application '{0}' was found neither in the scope cache nor in the repository")]
    ApplicationNotFound(String),
    #[error(transparent)]
    Repository(anyhow::Error),
    #[error(transparent)]
    Pdp(#[from] PdpError),
}

impl AuthorizationError {
    /// Contract violations that must not be retried
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AuthorizationError::InvalidAppId(_)
                | AuthorizationError::MissingCaller
                | AuthorizationError::ApplicationNotFound(_)
        )
    }
}
