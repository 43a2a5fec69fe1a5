//! Access control for a multi-tenant instance storage.
//!
//! Two decision layers are exposed: the [`ApiScopeAuthorizer`] gates read and
//! write operations per application using the caller's scope claim and a
//! periodically refreshed [`ScopeCache`], and the [`InstanceAuthorizer`]
//! delegates per-instance decisions to an external policy decision point in
//! batched XACML requests.

pub mod api;
pub mod app_state;
pub mod http;
pub mod init_telemetry;
pub mod pdp;
pub mod repository;
pub mod scheduler;
pub mod services;
pub mod settings;
pub mod stop_flag;

pub use app_state::{AppState, SharedAppState};
pub use services::{
    ApiScopeAuthorizer, AuthorizationError, InstanceAuthorizer, ScopeCache,
};
