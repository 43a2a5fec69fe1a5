//! Read access to application metadata.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use instance_authz_core::apps::Application;

pub use http::HttpApplicationRepository;
pub use memory::InMemoryApplicationRepository;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Every known application, in one bulk read
    async fn find_all(&self) -> anyhow::Result<Vec<Application>>;

    /// A single application by `{org}/{app}` id, `None` if it does not exist
    async fn find_one(&self, app_id: &str, org: &str) -> anyhow::Result<Option<Application>>;
}
