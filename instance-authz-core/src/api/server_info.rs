use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of the application scope cache as reported by the info endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScopeCacheInfo {
    pub built_at: Option<DateTime<Utc>>,
    pub age_seconds: Option<i64>,
    pub applications: usize,
    pub custom_scopes: usize,
    pub stale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    pub version: String,
    pub authorize_default_api_scopes: bool,
    pub scope_cache: ScopeCacheInfo,
}
