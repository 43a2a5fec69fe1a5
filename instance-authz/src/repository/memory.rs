use async_trait::async_trait;
use instance_authz_core::apps::Application;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ApplicationRepository;

/// Application repository held in memory, for tests and local runs
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationRepository {
    apps: Arc<RwLock<BTreeMap<String, Application>>>,
    failing: Arc<AtomicBool>,
    find_one_calls: Arc<AtomicUsize>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apps(apps: impl IntoIterator<Item = Application>) -> Self {
        let apps = apps.into_iter().map(|app| (app.id.clone(), app)).collect();
        Self {
            apps: Arc::new(RwLock::new(apps)),
            ..Self::default()
        }
    }

    pub async fn upsert(&self, app: Application) {
        self.apps.write().await.insert(app.id.clone(), app);
    }

    pub async fn remove(&self, app_id: &str) {
        self.apps.write().await.remove(app_id);
    }

    /// Make every subsequent call fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of single-application lookups served so far
    pub fn find_one_calls(&self) -> usize {
        self.find_one_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("Application repository is unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Application>> {
        self.check_available()?;
        Ok(self.apps.read().await.values().cloned().collect())
    }

    async fn find_one(&self, app_id: &str, org: &str) -> anyhow::Result<Option<Application>> {
        self.find_one_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .apps
            .read()
            .await
            .get(app_id)
            .filter(|app| app.org == org)
            .cloned())
    }
}
