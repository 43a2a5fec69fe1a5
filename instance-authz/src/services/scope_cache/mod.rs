//! Application scope cache.
//!
//! Holds the latest [`ScopeCacheSnapshot`] behind an [`ArcSwap`]. Readers
//! take the current snapshot without locking; the refresher replaces it
//! wholesale, so a reader never observes a half-built index.

mod refresh;
mod snapshot;

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use refresh::refresh_scope_cache;
pub use snapshot::ScopeCacheSnapshot;

#[derive(Debug)]
pub struct ScopeCache {
    current: ArcSwap<ScopeCacheSnapshot>,
    stale_reported: AtomicBool,
}

impl Default for ScopeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeCache {
    pub fn new() -> Self {
        Self::with_snapshot(ScopeCacheSnapshot::empty())
    }

    pub fn with_snapshot(snapshot: ScopeCacheSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
            stale_reported: AtomicBool::new(false),
        }
    }

    /// The current snapshot. Stays valid while held, even across refreshes.
    pub fn snapshot(&self) -> Arc<ScopeCacheSnapshot> {
        self.current.load_full()
    }

    /// Atomically replace the current snapshot, returning the previous one
    pub fn publish(&self, snapshot: ScopeCacheSnapshot) -> Arc<ScopeCacheSnapshot> {
        let previous = self.current.swap(Arc::new(snapshot));
        self.stale_reported.store(false, Ordering::SeqCst);
        previous
    }

    /// True for the first caller since the last publish. Used to warn about a
    /// stale snapshot once instead of on every decision.
    pub fn report_stale_once(&self) -> bool {
        !self.stale_reported.swap(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use instance_authz_core::apps::Application;
    use std::collections::HashSet;

    #[test]
    fn test_stale_report_fires_once_per_snapshot() {
        let cache = ScopeCache::new();
        assert!(cache.report_stale_once());
        assert!(!cache.report_stale_once());
        assert!(!cache.report_stale_once());

        cache.publish(ScopeCacheSnapshot::build(vec![], Utc::now()));
        assert!(cache.report_stale_once());
        assert!(!cache.report_stale_once());
    }

    fn snapshot_of(generation: usize) -> ScopeCacheSnapshot {
        // Every app of one generation declares the same scope, so a torn
        // read would show owners that disagree with the app index.
        let apps = (0..8)
            .map(|i| {
                Application::new(format!("gen{generation}/app{i}"), format!("gen{generation}"))
                    .with_api_scopes(Some(format!("gen{generation}:read").as_str()), None)
            })
            .collect();
        ScopeCacheSnapshot::build(apps, Utc::now())
    }

    #[test]
    fn test_held_snapshot_survives_publish() {
        let cache = ScopeCache::with_snapshot(snapshot_of(1));
        let held = cache.snapshot();

        let previous = cache.publish(snapshot_of(2));
        assert!(Arc::ptr_eq(&held, &previous));
        assert!(held.app("gen1/app0").is_some());
        assert!(cache.snapshot().app("gen2/app0").is_some());
        assert!(cache.snapshot().app("gen1/app0").is_none());
    }

    #[test]
    fn test_new_cache_starts_empty_and_stale() {
        let cache = ScopeCache::new();
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.app_count(), 0);
        assert!(snapshot.built_at().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_mixed_generations() {
        let cache = Arc::new(ScopeCache::with_snapshot(snapshot_of(0)));

        let writer = {
            let cache = cache.clone();
            tokio::spawn(async move {
                for generation in 1..200 {
                    cache.publish(snapshot_of(generation));
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let snapshot = cache.snapshot();
                        let orgs: HashSet<&str> = snapshot.apps().map(|a| a.org.as_str()).collect();
                        assert_eq!(orgs.len(), 1);
                        let org = orgs.into_iter().next().unwrap();

                        assert_eq!(snapshot.app_count(), 8);
                        assert_eq!(snapshot.custom_scope_count(), 1);
                        let owners = snapshot.scope_owners(&format!("{org}:read")).unwrap();
                        assert_eq!(owners.len(), 8);
                        assert!(owners.iter().all(|id| snapshot.app(id).is_some()));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
