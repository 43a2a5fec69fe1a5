use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::authorization::ApiOperation;

/// Custom API scopes an application requires instead of the platform defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScopes {
    pub read: Option<String>,
    pub write: Option<String>,
}

/// Application metadata as served by the application repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// `{org}/{app}`
    pub id: String,
    pub org: String,
    #[serde(default)]
    pub title: HashMap<String, String>,
    pub version_id: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub last_changed: Option<DateTime<Utc>>,
    pub api_scopes: Option<ApiScopes>,
}

impl Application {
    pub fn new(id: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            org: org.into(),
            ..Default::default()
        }
    }

    pub fn with_api_scopes(mut self, read: Option<&str>, write: Option<&str>) -> Self {
        self.api_scopes = Some(ApiScopes {
            read: read.map(str::to_string),
            write: write.map(str::to_string),
        });
        self
    }

    /// The custom scope declared for `operation`, ignoring blank values
    pub fn custom_scope(&self, operation: ApiOperation) -> Option<&str> {
        let scopes = self.api_scopes.as_ref()?;
        let scope = match operation {
            ApiOperation::Read => scopes.read.as_deref(),
            ApiOperation::Write => scopes.write.as_deref(),
        };
        scope.filter(|s| !s.trim().is_empty())
    }

    /// Distinct custom scopes declared by this application
    pub fn custom_scopes(&self) -> Vec<&str> {
        let mut scopes = Vec::with_capacity(2);
        for operation in [ApiOperation::Read, ApiOperation::Write] {
            if let Some(scope) = self.custom_scope(operation) {
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
            }
        }
        scopes
    }
}

/// Response body of the bulk application listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationList {
    pub applications: Vec<Application>,
}
