pub mod abac;
pub mod api_scope;
pub mod error;
pub mod required_scope;
pub mod scope_cache;

pub use abac::InstanceAuthorizer;
pub use api_scope::ApiScopeAuthorizer;
pub use error::AuthorizationError;
pub use scope_cache::ScopeCache;
