use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOwner {
    pub party_id: Option<String>,
    pub person_number: Option<String>,
    pub organisation_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessElementInfo {
    pub element_id: Option<String>,
    pub name: Option<String>,
    pub altinn_task_type: Option<String>,
    pub started: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessState {
    pub started: Option<DateTime<Utc>>,
    pub current_task: Option<ProcessElementInfo>,
    pub ended: Option<DateTime<Utc>>,
    pub end_event: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStatus {
    #[serde(default)]
    pub is_archived: bool,
    pub archived: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_soft_deleted: bool,
    pub soft_deleted: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_hard_deleted: bool,
    pub hard_deleted: Option<DateTime<Utc>>,
}

/// A stored instance (submission record)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// `{partyId}/{guid}`, absent until the instance has been created
    pub id: Option<String>,
    #[serde(default)]
    pub instance_owner: InstanceOwner,
    /// `{org}/{app}`
    pub app_id: String,
    pub org: String,
    #[serde(default)]
    pub title: HashMap<String, String>,
    pub process: Option<ProcessState>,
    pub status: Option<InstanceStatus>,
    pub created: Option<DateTime<Utc>>,
    pub last_changed: Option<DateTime<Utc>>,
    pub last_changed_by: Option<String>,
    pub due_before: Option<DateTime<Utc>>,
    pub visible_after: Option<DateTime<Utc>>,
}

impl Instance {
    pub fn new(app_id: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            org: org.into(),
            ..Default::default()
        }
    }

    /// The app short name, i.e. the part of `app_id` after the org
    pub fn app_name(&self) -> &str {
        self.app_id
            .split_once('/')
            .map(|(_, app)| app)
            .unwrap_or(&self.app_id)
    }

    /// The guid part of the composite id
    pub fn guid(&self) -> Option<&str> {
        let id = self.id.as_deref()?;
        Some(id.split_once('/').map(|(_, guid)| guid).unwrap_or(id))
    }

    pub fn party_id(&self) -> Option<&str> {
        self.instance_owner.party_id.as_deref()
    }

    /// Current task while the process runs. Ended processes have none.
    pub fn current_task_id(&self) -> Option<&str> {
        let process = self.process.as_ref()?;
        if process.ended.is_some() || process.end_event.is_some() {
            return None;
        }
        process.current_task.as_ref()?.element_id.as_deref()
    }

    /// End event of an ended process
    pub fn end_event(&self) -> Option<&str> {
        let process = self.process.as_ref()?;
        if process.ended.is_none() && process.end_event.is_none() {
            return None;
        }
        process.end_event.as_deref()
    }
}
