use axum::routing::get;
use axum::Router;

use crate::app_state::SharedAppState;

use super::handlers::health::health_checker_handler;
use super::handlers::info::info_handler;

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        Router::new()
            .route("/health", get(health_checker_handler))
            .route("/api/v1/health", get(health_checker_handler))
            .route("/api/v1/info", get(info_handler))
            .with_state(state)
    }
}
