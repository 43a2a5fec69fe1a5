use chrono::Utc;
use tracing::instrument;

use crate::app_state::SharedAppState;
use crate::services::scope_cache::refresh_scope_cache;

/// Build the scope cache once, then keep refreshing it until the stop flag is set
pub async fn setup_scope_cache_refresh(
    app_state: SharedAppState,
) -> anyhow::Result<tokio::task::JoinHandle<anyhow::Result<()>>> {
    schedule_scope_cache_refresh(app_state.clone()).await;

    let stop_flag = app_state.stop_flag.clone();
    let mut scheduler = clokwerk::AsyncScheduler::new();
    {
        let app_state = app_state.clone();
        scheduler
            .every(app_state.settings.scheduler.scope_cache_refresh.into())
            .run(move || {
                let app_state = app_state.clone();
                async move {
                    schedule_scope_cache_refresh(app_state).await;
                }
            });
    }

    let handle = tokio::spawn(async move {
        while !stop_flag.is_stopped() {
            scheduler.run_pending().await;
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
        tracing::info!("Scope cache refresh stopped");
        Ok(())
    });

    Ok(handle)
}

#[instrument(skip(app_state))]
pub async fn schedule_scope_cache_refresh(app_state: SharedAppState) {
    let cache = &app_state.scope_cache;
    if let Err(e) = refresh_scope_cache(cache, app_state.repository.as_ref()).await {
        tracing::error!(
            "Scope cache refresh failed, keeping the previous snapshot: {:?}",
            e
        );

        let max_age: chrono::Duration = app_state.settings.authorization.max_cache_staleness.into();
        let snapshot = cache.snapshot();
        if snapshot.is_stale(max_age, Utc::now()) && cache.report_stale_once() {
            tracing::warn!(
                built_at = ?snapshot.built_at(),
                "Scope cache exceeds the staleness ceiling, applications are read from the repository"
            );
        }
    }
}
