use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scopes::{
    DEFAULT_READ_SCOPE, DEFAULT_WRITE_SCOPE, SERVICE_OWNER_READ_SCOPE, SERVICE_OWNER_WRITE_SCOPE,
};

/// Operation class checked by the API scope gate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApiOperation {
    Read,
    Write,
}

impl ApiOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiOperation::Read => "read",
            ApiOperation::Write => "write",
        }
    }

    /// Platform-wide scope required when the app declares no custom scope
    pub fn default_scope(&self) -> &'static str {
        match self {
            ApiOperation::Read => DEFAULT_READ_SCOPE,
            ApiOperation::Write => DEFAULT_WRITE_SCOPE,
        }
    }

    /// Scope a service owner token needs for this operation
    pub fn service_owner_scope(&self) -> &'static str {
        match self {
            ApiOperation::Read => SERVICE_OWNER_READ_SCOPE,
            ApiOperation::Write => SERVICE_OWNER_WRITE_SCOPE,
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action types sent to the policy decision point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InstanceAction {
    Read,
    Write,
    Delete,
    Instantiate,
    Complete,
    Confirm,
    Sign,
    Reject,
}

impl InstanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceAction::Read => "read",
            InstanceAction::Write => "write",
            InstanceAction::Delete => "delete",
            InstanceAction::Instantiate => "instantiate",
            InstanceAction::Complete => "complete",
            InstanceAction::Confirm => "confirm",
            InstanceAction::Sign => "sign",
            InstanceAction::Reject => "reject",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<InstanceAction> {
        match s.to_lowercase().as_str() {
            "read" => Some(InstanceAction::Read),
            "write" => Some(InstanceAction::Write),
            "delete" => Some(InstanceAction::Delete),
            "instantiate" => Some(InstanceAction::Instantiate),
            "complete" => Some(InstanceAction::Complete),
            "confirm" => Some(InstanceAction::Confirm),
            "sign" => Some(InstanceAction::Sign),
            "reject" => Some(InstanceAction::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
