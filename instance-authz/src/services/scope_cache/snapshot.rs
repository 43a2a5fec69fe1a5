use chrono::{DateTime, Duration, Utc};
use instance_authz_core::api::ScopeCacheInfo;
use instance_authz_core::apps::Application;
use std::collections::{HashMap, HashSet};

/// Immutable view of all applications and the custom scopes they declare.
///
/// A snapshot is never mutated after it has been built. Readers hold it
/// through an `Arc` and always see a consistent pair of indexes.
#[derive(Debug, Clone, Default)]
pub struct ScopeCacheSnapshot {
    apps: HashMap<String, Application>,
    custom_scopes: HashMap<String, HashSet<String>>,
    built_at: Option<DateTime<Utc>>,
}

impl ScopeCacheSnapshot {
    /// The snapshot served before the first successful refresh
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(applications: Vec<Application>, built_at: DateTime<Utc>) -> Self {
        // Later records win for a duplicated id; index scopes of the survivors only
        let apps: HashMap<String, Application> = applications
            .into_iter()
            .map(|app| (app.id.clone(), app))
            .collect();

        let mut custom_scopes: HashMap<String, HashSet<String>> = HashMap::new();
        for app in apps.values() {
            for scope in app.custom_scopes() {
                custom_scopes
                    .entry(scope.to_string())
                    .or_default()
                    .insert(app.id.clone());
            }
        }

        Self {
            apps,
            custom_scopes,
            built_at: Some(built_at),
        }
    }

    pub fn app(&self, app_id: &str) -> Option<&Application> {
        self.apps.get(app_id)
    }

    pub fn apps(&self) -> impl Iterator<Item = &Application> {
        self.apps.values()
    }

    /// Ids of the applications declaring `scope` as a custom scope
    pub fn scope_owners(&self, scope: &str) -> Option<&HashSet<String>> {
        self.custom_scopes.get(scope)
    }

    pub fn is_custom_scope(&self, scope: &str) -> bool {
        self.custom_scopes.contains_key(scope)
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    pub fn custom_scope_count(&self) -> usize {
        self.custom_scopes.len()
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// A snapshot that was never built is always stale
    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match self.built_at {
            Some(built_at) => now - built_at > max_age,
            None => true,
        }
    }

    pub fn info(&self, max_age: Duration, now: DateTime<Utc>) -> ScopeCacheInfo {
        ScopeCacheInfo {
            built_at: self.built_at,
            age_seconds: self.built_at.map(|b| (now - b).num_seconds()),
            applications: self.app_count(),
            custom_scopes: self.custom_scope_count(),
            stale: self.is_stale(max_age, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instance_authz_core::authorization::ApiOperation;

    fn apps() -> Vec<Application> {
        vec![
            Application::new("ttd/app1", "ttd").with_api_scopes(Some("ttd:app1.read"), None),
            Application::new("ttd/app2", "ttd")
                .with_api_scopes(Some("ttd:shared"), Some("ttd:shared")),
            Application::new("skd/app3", "skd").with_api_scopes(None, Some("ttd:shared")),
            Application::new("skd/plain", "skd"),
        ]
    }

    #[test]
    fn test_build_indexes_apps_and_custom_scopes() {
        let snapshot = ScopeCacheSnapshot::build(apps(), Utc::now());

        assert_eq!(snapshot.app_count(), 4);
        assert_eq!(snapshot.custom_scope_count(), 2);
        assert!(snapshot.app("skd/plain").is_some());

        let owners = snapshot.scope_owners("ttd:shared").unwrap();
        assert_eq!(owners.len(), 2);
        assert!(owners.contains("ttd/app2"));
        assert!(owners.contains("skd/app3"));

        assert_eq!(
            snapshot.scope_owners("ttd:app1.read").unwrap(),
            &HashSet::from(["ttd/app1".to_string()])
        );
        assert!(!snapshot.is_custom_scope("altinn:instances.read"));
    }

    #[test]
    fn test_duplicate_ids_index_only_the_surviving_record() {
        let snapshot = ScopeCacheSnapshot::build(
            vec![
                Application::new("ttd/app1", "ttd").with_api_scopes(Some("ttd:old.read"), None),
                Application::new("ttd/app1", "ttd").with_api_scopes(Some("ttd:new.read"), None),
            ],
            Utc::now(),
        );

        assert_eq!(snapshot.app_count(), 1);
        assert_eq!(
            snapshot.app("ttd/app1").unwrap().custom_scope(ApiOperation::Read),
            Some("ttd:new.read")
        );
        assert!(snapshot.scope_owners("ttd:old.read").is_none());
        assert!(snapshot.scope_owners("ttd:new.read").unwrap().contains("ttd/app1"));
        assert_eq!(snapshot.custom_scope_count(), 1);
    }

    #[test]
    fn test_blank_custom_scopes_are_not_indexed() {
        let snapshot = ScopeCacheSnapshot::build(
            vec![Application::new("ttd/app1", "ttd").with_api_scopes(Some("  "), Some(""))],
            Utc::now(),
        );
        assert_eq!(snapshot.custom_scope_count(), 0);
        assert_eq!(snapshot.app_count(), 1);
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        assert!(ScopeCacheSnapshot::empty().is_stale(Duration::minutes(10), now));

        let snapshot = ScopeCacheSnapshot::build(vec![], now - Duration::minutes(5));
        assert!(!snapshot.is_stale(Duration::minutes(10), now));
        assert!(snapshot.is_stale(Duration::minutes(4), now));

        let info = snapshot.info(Duration::minutes(10), now);
        assert_eq!(info.age_seconds, Some(300));
        assert!(!info.stale);
    }
}
