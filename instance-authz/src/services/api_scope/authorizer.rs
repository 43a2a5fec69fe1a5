use chrono::Utc;
use instance_authz_core::apps::{AppId, Application};
use instance_authz_core::authorization::ApiOperation;
use instance_authz_core::claims::{CallerKind, Principal};
use instance_authz_core::instances::Instance;
use instance_authz_core::scopes::{Scopes, PORTAL_END_USER_SCOPE};
use instance_authz_core::settings::authorization::AuthorizationSettings;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::repository::ApplicationRepository;
use crate::services::error::AuthorizationError;
use crate::services::scope_cache::{ScopeCache, ScopeCacheSnapshot};

#[derive(Clone)]
pub struct ApiScopeAuthorizer {
    cache: Arc<ScopeCache>,
    repository: Arc<dyn ApplicationRepository>,
    settings: AuthorizationSettings,
}

impl ApiScopeAuthorizer {
    pub fn new(
        cache: Arc<ScopeCache>,
        repository: Arc<dyn ApplicationRepository>,
        settings: AuthorizationSettings,
    ) -> Self {
        Self {
            cache,
            repository,
            settings,
        }
    }

    /// Decide whether `caller` may perform `operation` against instances of `app_id`.
    #[instrument(skip(self, caller))]
    pub async fn authorize(
        &self,
        caller: Option<&Principal>,
        operation: ApiOperation,
        app_id: &str,
    ) -> Result<bool, AuthorizationError> {
        let enforce_defaults = self.settings.authorize_default_api_scopes;

        let Some(caller) = caller.filter(|c| c.is_authenticated()) else {
            debug!("No authenticated caller");
            return Ok(!enforce_defaults);
        };

        let scopes = caller.scopes();

        if scopes.has_scope(PORTAL_END_USER_SCOPE) {
            debug!("Portal end user scope covers every application");
            return Ok(true);
        }

        if caller.caller_kind() == CallerKind::ServiceOwner {
            let permitted =
                !enforce_defaults || scopes.has_scope(operation.service_owner_scope());
            debug!(permitted, "Service owner caller");
            return Ok(permitted);
        }

        // One snapshot for the whole decision
        let snapshot = self.cache.snapshot();
        let app = self.find_application(&snapshot, app_id).await?;

        if let Some(custom_scope) = app.custom_scope(operation) {
            let permitted = scopes.has_scope(custom_scope);
            debug!(permitted, custom_scope, "Application requires a custom scope");
            return Ok(permitted);
        }

        if let Some(permitted) = Self::check_foreign_custom_scopes(&snapshot, scopes, app_id) {
            return Ok(permitted);
        }

        let permitted = !enforce_defaults || scopes.has_scope(operation.default_scope());
        debug!(permitted, "Default scope check");
        Ok(permitted)
    }

    /// Same as [`ApiScopeAuthorizer::authorize`] for the application owning `instance`
    pub async fn authorize_instance(
        &self,
        caller: Option<&Principal>,
        operation: ApiOperation,
        instance: &Instance,
    ) -> Result<bool, AuthorizationError> {
        self.authorize(caller, operation, &instance.app_id).await
    }

    /// Look the application up in the snapshot, falling back to the repository on
    /// a miss or when the snapshot is older than the staleness ceiling.
    async fn find_application<'a>(
        &self,
        snapshot: &'a ScopeCacheSnapshot,
        app_id: &str,
    ) -> Result<Cow<'a, Application>, AuthorizationError> {
        let id = AppId::parse(app_id)?;

        let max_age: chrono::Duration = self.settings.max_cache_staleness.into();
        if snapshot.is_stale(max_age, Utc::now()) {
            if self.cache.report_stale_once() {
                warn!(
                    built_at = ?snapshot.built_at(),
                    "Scope cache exceeds the staleness ceiling, applications are read from the repository"
                );
            }
            debug!("Stale scope cache, reading {} from the repository", app_id);
        } else if let Some(app) = snapshot.app(app_id) {
            return Ok(Cow::Borrowed(app));
        } else {
            debug!("Scope cache miss for {}", app_id);
        }

        self.repository
            .find_one(app_id, id.org)
            .await
            .map_err(AuthorizationError::Repository)?
            .map(Cow::Owned)
            .ok_or_else(|| AuthorizationError::ApplicationNotFound(app_id.to_string()))
    }

    /// `None` if no held scope is a custom scope of any application. Otherwise
    /// whether `app_id` owns one of the held custom scopes.
    fn check_foreign_custom_scopes(
        snapshot: &ScopeCacheSnapshot,
        scopes: Scopes<'_>,
        app_id: &str,
    ) -> Option<bool> {
        let mut matched = false;
        for scope in scopes {
            if let Some(owners) = snapshot.scope_owners(scope) {
                if owners.contains(app_id) {
                    debug!(scope, "Held custom scope is owned by this application");
                    return Some(true);
                }
                matched = true;
            }
        }

        if matched {
            info!("Denied: held custom scopes belong to other applications");
            return Some(false);
        }
        None
    }
}
