use anyhow::Context;
use async_trait::async_trait;
use instance_authz_core::apps::{AppId, Application, ApplicationList};
use instance_authz_core::http::HttpClient;
use instance_authz_core::settings::storage::StorageSettings;
use std::time::Duration;
use tracing::{debug, instrument};

use super::ApplicationRepository;

/// Application repository backed by the storage REST API
#[derive(Debug, Clone)]
pub struct HttpApplicationRepository {
    client: HttpClient,
    settings: StorageSettings,
}

impl HttpApplicationRepository {
    pub fn new(settings: StorageSettings) -> anyhow::Result<Self> {
        let client = HttpClient::builder()
            .with_timeout(Duration::from_secs(settings.timeout_seconds))
            .with_retry_config(settings.retry.clone())
            .build()
            .context("Failed to create HTTP client for the application repository")?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ApplicationRepository for HttpApplicationRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> anyhow::Result<Vec<Application>> {
        let list: ApplicationList = self
            .client
            .get_json(&self.settings.applications_url())
            .await
            .context("Failed to fetch applications")?;
        debug!("Fetched {} applications", list.applications.len());
        Ok(list.applications)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, app_id: &str, org: &str) -> anyhow::Result<Option<Application>> {
        let id = AppId::parse(app_id)?;
        let url = self.settings.application_url(
            &urlencoding::encode(org),
            &urlencoding::encode(id.app),
        );
        self.client
            .get_json_optional(&url)
            .await
            .with_context(|| format!("Failed to fetch application {app_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn repository(server: &MockServer) -> HttpApplicationRepository {
        HttpApplicationRepository::new(StorageSettings::new(format!(
            "{}/storage/api/v1",
            server.uri()
        )))
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_all_reads_application_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/api/v1/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "applications": [
                    {"id": "ttd/app1", "org": "ttd"},
                    {"id": "ttd/app2", "org": "ttd", "apiScopes": {"read": "ttd:app2.read"}}
                ]
            })))
            .mount(&server)
            .await;

        let apps = repository(&server).await.find_all().await.unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[1].api_scopes.as_ref().unwrap().read.as_deref(), Some("ttd:app2.read"));
    }

    #[tokio::test]
    async fn test_find_one_maps_not_found_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/api/v1/applications/ttd/app1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "ttd/app1", "org": "ttd"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/storage/api/v1/applications/ttd/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let repository = repository(&server).await;
        let app = repository.find_one("ttd/app1", "ttd").await.unwrap();
        assert_eq!(app.map(|a| a.id), Some("ttd/app1".to_string()));

        let missing = repository.find_one("ttd/missing", "ttd").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_one_rejects_malformed_app_id() {
        let server = MockServer::start().await;
        let result = repository(&server).await.find_one("ttd", "ttd").await;
        assert!(result.is_err());
    }
}
