use std::sync::Arc;

use instance_authz_core::settings::authorization::AuthorizationSettings;
use tracing::info;

use crate::pdp::{HttpPolicyDecisionPoint, PolicyDecisionPoint};
use crate::repository::{ApplicationRepository, HttpApplicationRepository};
use crate::services::abac::{DecisionValidator, PermitDecisionValidator};
use crate::services::{ApiScopeAuthorizer, InstanceAuthorizer, ScopeCache};
use crate::settings::config::Settings;
use crate::stop_flag;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub scope_cache: Arc<ScopeCache>,
    pub repository: Arc<dyn ApplicationRepository>,
    pub api_scope_authorizer: ApiScopeAuthorizer,
    pub instance_authorizer: InstanceAuthorizer,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    /// State wired to the configured storage and decision point, with signal handling
    pub fn new(settings: Settings) -> anyhow::Result<SharedAppState> {
        let repository = Arc::new(HttpApplicationRepository::new(settings.storage.clone())?);
        let pdp = Arc::new(HttpPolicyDecisionPoint::new(&settings.pdp)?);
        info!(
            storage = %settings.storage.base_url,
            pdp = %settings.pdp.endpoint,
            "Collaborators configured"
        );

        let state = Self::from_parts(settings, repository, pdp, Arc::new(PermitDecisionValidator));
        stop_flag::register_signal_handler(&state.stop_flag);
        Ok(state)
    }

    pub fn from_parts(
        settings: Settings,
        repository: Arc<dyn ApplicationRepository>,
        pdp: Arc<dyn PolicyDecisionPoint>,
        validator: Arc<dyn DecisionValidator>,
    ) -> SharedAppState {
        let scope_cache = Arc::new(ScopeCache::new());
        let api_scope_authorizer = ApiScopeAuthorizer::new(
            scope_cache.clone(),
            repository.clone(),
            settings.authorization.clone(),
        );
        let instance_authorizer = InstanceAuthorizer::new(pdp, validator);

        Arc::new(AppState {
            settings,
            stop_flag: stop_flag::StopFlag::new(),
            scope_cache,
            repository,
            api_scope_authorizer,
            instance_authorizer,
        })
    }

    pub fn authorization_settings(&self) -> &AuthorizationSettings {
        &self.settings.authorization
    }
}
