pub mod app_id;
pub mod application;

pub use app_id::{AppId, InvalidAppId};
pub use application::{ApiScopes, Application, ApplicationList};
