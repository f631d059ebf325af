// Article API client

use crate::{ArticleSource, FetchError, Result, sort_by_freshness};
use async_trait::async_trait;
use newsroom_core::ArticleRecord;
use newsroom_core::config::ApiConfig;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Characters of an error body kept in [`FetchError::Status`]
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the `/articles/` endpoint
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    request_limit: usize,
}

impl ApiClient {
    /// Create a client with the configured connect and request timeouts
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_limit: config.request_limit,
        })
    }

    /// Issue the single bounded request and return the decoded records
    /// in response order.
    async fn fetch_page(&self) -> Result<Vec<ArticleRecord>> {
        let url = format!("{}/articles/", self.base_url);
        info!(url = %url, limit = self.request_limit, "Fetching articles");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.request_limit)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Article API returned an error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(FetchError::MalformedResponse(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                )));
            }
        };

        debug!(count = items.len(), bytes = body.len(), "Article API response decoded");
        Ok(items.iter().map(ArticleRecord::from_json).collect())
    }
}

#[async_trait]
impl ArticleSource for ApiClient {
    async fn fetch_latest(&self, limit: usize) -> Result<Vec<ArticleRecord>> {
        let mut records = self.fetch_page().await?;
        sort_by_freshness(&mut records);
        records.truncate(limit);

        info!(count = records.len(), "Fetched latest articles");
        Ok(records)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, request_limit: usize) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: server.uri(),
            request_limit,
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_latest_sorts_and_truncates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/"))
            .and(query_param("limit", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Old", "content": "a", "published_at": "2024-01-01"},
                {"id": 2, "title": "New", "content": "b", "published_at": "2024-06-01"},
                {"id": 3, "title": "Mid", "content": "c", "created_at": "2024-03-01"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 500);
        let records = client.fetch_latest(2).await.unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title_text()).collect();
        assert_eq!(titles, vec!["New", "Mid"]);
    }

    #[tokio::test]
    async fn test_fetch_latest_does_not_filter_invalid_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Valid", "content": "body"},
                {"id": 2, "title": "No content", "content": ""},
                "not even an object"
            ])))
            .mount(&mock_server)
            .await;

        let records = client_for(&mock_server, 10).fetch_latest(10).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().filter(|r| r.is_renderable()).count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_latest_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("x".repeat(500)))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server, 10).fetch_latest(10).await.unwrap_err();
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body.len(), ERROR_BODY_PREVIEW);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_latest_rejects_non_array() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server, 10).fetch_latest(10).await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn test_fetch_latest_rejects_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server, 10).fetch_latest(10).await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_latest_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&ApiConfig {
            base_url: mock_server.uri(),
            request_limit: 10,
            connect_timeout: Duration::from_secs(1),
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        let err = client.fetch_latest(10).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_latest_connection_refused() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_limit: 10,
            connect_timeout: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let err = client.fetch_latest(10).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
