use config::{Config, ConfigError, Environment, File};
use instance_authz_core::settings::{
    api_server::ApiServer, authorization::AuthorizationSettings, pdp::PdpSettings,
    scheduler_interval::SchedulerInterval, storage::StorageSettings,
};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct Scheduler {
    pub scope_cache_refresh: SchedulerInterval,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler {
            scope_cache_refresh: SchedulerInterval::Minutes(1),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub api: ApiServer,
    #[serde(default)]
    pub authorization: AuthorizationSettings,
    #[serde(default)]
    pub scheduler: Scheduler,
    pub pdp: PdpSettings,
    pub storage: StorageSettings,
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("INSTANCE_AUTHZ")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode =
            env::var("INSTANCE_AUTHZ_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        builder.build()?.try_deserialize()
    }

    fn with_defaults<St: config::builder::BuilderState>(
        builder: config::builder::ConfigBuilder<St>,
    ) -> Result<config::builder::ConfigBuilder<St>, ConfigError> {
        builder
            .set_default("api.bind_address", "0.0.0.0:5050")?
            .set_default("authorization.authorize_default_api_scopes", true)?
            .set_default("authorization.max_cache_staleness", "10m")?
            .set_default("scheduler.scope_cache_refresh", "1m")
    }
}
