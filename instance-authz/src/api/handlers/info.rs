use axum::{debug_handler, extract::State, response::IntoResponse, Json};
use chrono::Utc;
use instance_authz_core::api::ServerInfo;

use crate::app_state::SharedAppState;

/// Version and scope cache state of the running service
#[debug_handler]
pub async fn info_handler(State(state): State<SharedAppState>) -> impl IntoResponse {
    let settings = state.authorization_settings();
    let snapshot = state.scope_cache.snapshot();

    Json(ServerInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        authorize_default_api_scopes: settings.authorize_default_api_scopes,
        scope_cache: snapshot.info(settings.max_cache_staleness.into(), Utc::now()),
    })
}
