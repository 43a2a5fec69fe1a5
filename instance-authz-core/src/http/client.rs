use super::error::HttpError;
use super::retry::{with_retry, RetryConfig, RetryError};
use reqwest::header::HeaderMap;
use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("instance-authz/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY_LEN: usize = 500;

/// JSON client shared by the application repository and the decision point.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
    retry_config: RetryConfig,
}

#[derive(Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    retry_config: Option<RetryConfig>,
    headers: Option<HeaderMap>,
}

impl HttpClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn build(self) -> anyhow::Result<HttpClient> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .default_headers(self.headers.unwrap_or_default())
            .build()?;

        Ok(HttpClient {
            client,
            timeout,
            retry_config: self.retry_config.unwrap_or_default(),
        })
    }
}

/// Error text of a failed response: ProblemDetails `detail` or `title`,
/// a `message` field, or the raw body if it is short enough to log.
fn error_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let field = ["detail", "title", "message"]
            .iter()
            .find_map(|key| json.get(key).and_then(|v| v.as_str()));
        if let Some(message) = field {
            return Some(message.to_string());
        }
    }
    let body = body.trim();
    (!body.is_empty() && body.len() < MAX_ERROR_BODY_LEN).then(|| body.to_string())
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    async fn error_from_response(response: Response) -> HttpError {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| error_message(&body))
            .unwrap_or_else(|| status.to_string());
        HttpError::from_status(status, message)
    }

    async fn parse_json<R>(response: Response) -> Result<R, HttpError>
    where
        R: DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| HttpError::ParseError(e.to_string()))
    }

    /// GET and deserialize a JSON body
    pub async fn get_json<R>(&self, url: &str) -> Result<R, RetryError>
    where
        R: DeserializeOwned,
    {
        debug!("GET {}", url);
        with_retry(
            || async {
                let response = self.client.get(url).timeout(self.timeout).send().await?;
                Self::parse_json(response).await
            },
            &self.retry_config,
        )
        .await
    }

    /// Like [`HttpClient::get_json`], but a 404 is `None`
    pub async fn get_json_optional<R>(&self, url: &str) -> Result<Option<R>, RetryError>
    where
        R: DeserializeOwned,
    {
        match self.get_json(url).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// POST a JSON body and deserialize the JSON response
    pub async fn post_json<T, R>(&self, url: &str, body: &T) -> Result<R, RetryError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!("POST {}", url);
        with_retry(
            || async {
                let response = self
                    .client
                    .post(url)
                    .timeout(self.timeout)
                    .json(body)
                    .send()
                    .await?;
                Self::parse_json(response).await
            },
            &self.retry_config,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    fn client() -> HttpClient {
        HttpClient::builder()
            .with_retry_config(RetryConfig {
                max_attempts: 2,
                initial_delay_ms: 1,
                max_delay_ms: 1,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_error_message_prefers_problem_details() {
        assert_eq!(
            error_message(r#"{"title":"Bad Request","detail":"Invalid app id"}"#).as_deref(),
            Some("Invalid app id")
        );
        assert_eq!(
            error_message(r#"{"title":"Not Found","status":404}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(
            error_message(r#"{"message":"Missing subscription key"}"#).as_deref(),
            Some("Missing subscription key")
        );
        assert_eq!(error_message("  plain text  ").as_deref(), Some("plain text"));
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(&"x".repeat(MAX_ERROR_BODY_LEN)), None);
    }

    #[tokio::test]
    async fn test_get_json_optional_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/present"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = client();
        let missing: Option<Pong> = client
            .get_json_optional(&format!("{}/missing", server.uri()))
            .await
            .unwrap();
        assert!(missing.is_none());

        let present: Option<Pong> = client
            .get_json_optional(&format!("{}/present", server.uri()))
            .await
            .unwrap();
        assert_eq!(present, Some(Pong { ok: true }));
    }

    #[tokio::test]
    async fn test_post_json_sends_body_and_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/decide"))
            .and(header("x-test", "yes"))
            .and(header("user-agent", USER_AGENT))
            .and(body_json(serde_json::json!({"question": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": false})))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-test", "yes".parse().unwrap());
        let client = HttpClient::builder()
            .with_default_headers(headers)
            .build()
            .unwrap();

        let pong: Pong = client
            .post_json(
                &format!("{}/decide", server.uri()),
                &serde_json::json!({"question": 1}),
            )
            .await
            .unwrap();
        assert_eq!(pong, Pong { ok: false });
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "database offline"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let err = client()
            .get_json::<Pong>(&format!("{}/broken", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, RetryError::ExhaustedRetries { attempts: 2, .. }));
        assert_eq!(err.status_code(), Some(500));
        assert!(err.to_string().contains("database offline"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client()
            .get_json::<Pong>(&format!("{}/garbage", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_parse_error());
    }
}
