use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::instance::Instance;

const PREFERRED_TITLE_LANGUAGE: &str = "nb";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteStatus {
    #[default]
    Default,
    SoftDeleted,
    HardDeleted,
}

/// Caller-facing summary of an instance, annotated with the caller's permissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBoxInstance {
    /// Instance guid
    pub id: String,
    pub instance_owner_id: Option<String>,
    pub org: String,
    pub app_name: String,
    pub title: Option<String>,
    pub process_current_task: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_changed_date_time: Option<DateTime<Utc>>,
    pub last_changed_by: Option<String>,
    pub due_date_time: Option<DateTime<Utc>>,
    pub archived_date_time: Option<DateTime<Utc>>,
    pub deleted_date_time: Option<DateTime<Utc>>,
    pub delete_status: DeleteStatus,
    pub authorized_for_write: bool,
    pub allow_delete: bool,
}

impl From<&Instance> for MessageBoxInstance {
    fn from(instance: &Instance) -> Self {
        let status = instance.status.clone().unwrap_or_default();
        let delete_status = if status.is_hard_deleted {
            DeleteStatus::HardDeleted
        } else if status.is_soft_deleted {
            DeleteStatus::SoftDeleted
        } else {
            DeleteStatus::Default
        };

        let title = instance
            .title
            .get(PREFERRED_TITLE_LANGUAGE)
            .or_else(|| {
                let mut languages: Vec<&String> = instance.title.keys().collect();
                languages.sort();
                languages.first().and_then(|l| instance.title.get(*l))
            })
            .cloned();

        MessageBoxInstance {
            id: instance.guid().unwrap_or_default().to_string(),
            instance_owner_id: instance.party_id().map(str::to_string),
            org: instance.org.clone(),
            app_name: instance.app_name().to_string(),
            title,
            process_current_task: instance.current_task_id().map(str::to_string),
            created_date_time: instance.created,
            last_changed_date_time: instance.last_changed,
            last_changed_by: instance.last_changed_by.clone(),
            due_date_time: instance.due_before,
            archived_date_time: status.archived,
            deleted_date_time: status.soft_deleted.or(status.hard_deleted),
            delete_status,
            authorized_for_write: false,
            allow_delete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instances::instance::{InstanceOwner, InstanceStatus};
    use std::collections::HashMap;

    #[test]
    fn test_conversion_defaults_flags_to_false() {
        let instance = Instance {
            id: Some("1000/6f8a1ab4-3f2e-4a5c-9b1f-0c3a2e4d5b6c".to_string()),
            instance_owner: InstanceOwner {
                party_id: Some("1000".to_string()),
                ..Default::default()
            },
            title: HashMap::from([
                ("en".to_string(), "Tax return".to_string()),
                ("nb".to_string(), "Skattemelding".to_string()),
            ]),
            status: Some(InstanceStatus {
                is_soft_deleted: true,
                ..Default::default()
            }),
            ..Instance::new("ttd/app1", "ttd")
        };

        let summary = MessageBoxInstance::from(&instance);
        assert_eq!(summary.id, "6f8a1ab4-3f2e-4a5c-9b1f-0c3a2e4d5b6c");
        assert_eq!(summary.instance_owner_id.as_deref(), Some("1000"));
        assert_eq!(summary.app_name, "app1");
        assert_eq!(summary.title.as_deref(), Some("Skattemelding"));
        assert_eq!(summary.delete_status, DeleteStatus::SoftDeleted);
        assert!(!summary.authorized_for_write);
        assert!(!summary.allow_delete);
    }
}
