use serde::Deserialize;

use super::scheduler_interval::SchedulerInterval;

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct AuthorizationSettings {
    /// Require the platform default scopes when an app declares no custom scope.
    /// When disabled such callers are permitted without scope checks.
    #[serde(default = "default_authorize_default_api_scopes")]
    pub authorize_default_api_scopes: bool,
    /// Snapshots older than this are not trusted for application lookups
    #[serde(default = "default_max_cache_staleness")]
    pub max_cache_staleness: SchedulerInterval,
}

fn default_authorize_default_api_scopes() -> bool {
    true
}

fn default_max_cache_staleness() -> SchedulerInterval {
    SchedulerInterval::Minutes(10)
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            authorize_default_api_scopes: default_authorize_default_api_scopes(),
            max_cache_staleness: default_max_cache_staleness(),
        }
    }
}

impl AuthorizationSettings {
    pub fn new(authorize_default_api_scopes: bool, max_cache_staleness: SchedulerInterval) -> Self {
        Self {
            authorize_default_api_scopes,
            max_cache_staleness,
        }
    }
}
