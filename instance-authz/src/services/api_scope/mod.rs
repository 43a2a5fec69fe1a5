//! Coarse-grained gate deciding whether a caller may read or write
//! instances of an application, based on the token's scope claim alone.

mod authorizer;


pub use authorizer::ApiScopeAuthorizer;
