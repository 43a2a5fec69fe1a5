//! Failures of calls to the storage API and the policy decision point.
//!
//! The status code survives the error chain so that a missing application
//! (404) can be told apart from an unavailable upstream.
//!
//! ```
//! use instance_authz_core::http::HttpError;
//!
//! let err = HttpError::http(404, "Not found");
//! assert_eq!(err.status_code(), Some(404));
//! assert!(err.is_not_found());
//! ```

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection refused, DNS failure and other transport errors
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    /// The body of a successful response did not deserialize
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::from_status(status, err.to_string())
        } else if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl HttpError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::http(status.as_u16(), message)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
