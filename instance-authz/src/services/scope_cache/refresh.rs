use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{ScopeCache, ScopeCacheSnapshot};
use crate::repository::ApplicationRepository;

/// Rebuild the scope cache from one bulk read of the repository.
///
/// On failure the current snapshot is left in place and the error is
/// returned for the caller to log.
#[instrument(skip_all)]
pub async fn refresh_scope_cache(
    cache: &ScopeCache,
    repository: &dyn ApplicationRepository,
) -> anyhow::Result<Arc<ScopeCacheSnapshot>> {
    let applications = repository.find_all().await?;
    let snapshot = ScopeCacheSnapshot::build(applications, Utc::now());
    info!(
        "Refreshed scope cache with {} applications and {} custom scopes",
        snapshot.app_count(),
        snapshot.custom_scope_count()
    );
    cache.publish(snapshot);
    Ok(cache.snapshot())
}
