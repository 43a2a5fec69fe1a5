pub mod api;
pub mod apps;
pub mod authorization;
pub mod claims;
pub mod http;
pub mod instances;
pub mod scopes;
pub mod settings;
pub mod xacml;
