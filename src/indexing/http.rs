// src/indexing/http.rs

//! Remote indexing service client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use url::Url;

use crate::error::{AppError, Result};
use crate::indexing::{ContainerRegistry, ContainerSpec, Indexer};
use crate::models::IndexingConfig;

/// Client for an HTTP indexing service.
#[derive(Clone)]
pub struct HttpIndexer {
    client: Client,
    endpoint: Url,
    submit_url: Url,
    container_url: Url,
    api_key: Option<String>,
}

impl HttpIndexer {
    /// Build a client from the indexing configuration. Requires an endpoint.
    pub fn new(client: Client, config: &IndexingConfig) -> Result<Self> {
        let raw = config
            .endpoint
            .as_deref()
            .ok_or_else(|| AppError::config("indexing.endpoint is not set"))?;

        // Keep the last path segment of the endpoint when joining.
        let endpoint = Url::parse(&format!("{}/", raw.trim_end_matches('/')))?;
        let submit_url = endpoint.join(config.submit_path.trim_start_matches('/'))?;
        let container_url = endpoint.join(config.container_path.trim_start_matches('/'))?;

        Ok(Self {
            client,
            endpoint,
            submit_url,
            container_url,
            api_key: config.api_key(),
        })
    }

    /// Override the bearer key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn post(&self, url: &Url) -> RequestBuilder {
        let request = self.client.post(url.clone());
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl Indexer for HttpIndexer {
    async fn submit(&self, container_id: &str, text: &str) -> Result<()> {
        let response = self
            .post(&self.submit_url)
            .json(&json!({ "sourceId": container_id, "textContent": text }))
            .send()
            .await
            .map_err(AppError::submission)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::submission(format!("status {status}: {}", body.trim())))
    }
}

#[async_trait]
impl ContainerRegistry for HttpIndexer {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        let response = self
            .post(&self.container_url)
            .header("Prefer", "return=representation")
            .json(&json!({
                "user_id": spec.owner_id,
                "agent_id": spec.agent_id,
                "name": spec.label,
                "type": spec.kind,
            }))
            .send()
            .await
            .map_err(AppError::container)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::container(format!(
                "status {status}: {}",
                body.trim()
            )));
        }

        let value: Value = response.json().await.map_err(AppError::container)?;
        container_id(&value)
            .ok_or_else(|| AppError::container(format!("response has no id: {value}")))
    }
}

/// Read `id` from an object, or from the first element of an array.
fn container_id(value: &Value) -> Option<String> {
    let record = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match record.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn indexer(server: &MockServer) -> HttpIndexer {
        let config = IndexingConfig {
            endpoint: Some(server.uri()),
            ..IndexingConfig::default()
        };
        HttpIndexer::new(Client::new(), &config)
            .unwrap()
            .with_api_key("secret")
    }

    #[test]
    fn test_urls_keep_endpoint_path() {
        let config = IndexingConfig {
            endpoint: Some("https://index.test/api".to_string()),
            ..IndexingConfig::default()
        };
        let indexer = HttpIndexer::new(Client::new(), &config).unwrap();
        assert_eq!(
            indexer.submit_url.as_str(),
            "https://index.test/api/functions/v1/embed-and-store"
        );
        assert_eq!(
            indexer.container_url.as_str(),
            "https://index.test/api/rest/v1/knowledge_sources"
        );
    }

    #[test]
    fn test_new_requires_endpoint() {
        let result = HttpIndexer::new(Client::new(), &IndexingConfig::default());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_container_id_shapes() {
        assert_eq!(container_id(&json!({"id": "abc"})), Some("abc".to_string()));
        assert_eq!(container_id(&json!([{"id": 42}])), Some("42".to_string()));
        assert_eq!(container_id(&json!([])), None);
        assert_eq!(container_id(&json!({"name": "x"})), None);
    }

    #[tokio::test]
    async fn test_submit_posts_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/embed-and-store"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({ "sourceId": "src-1", "textContent": "Property: A" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        indexer(&server).submit("src-1", "Property: A").await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("embedding quota"))
            .mount(&server)
            .await;

        let err = indexer(&server).submit("src-1", "x").await.unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(_)));
        assert!(err.to_string().contains("embedding quota"));
    }

    #[tokio::test]
    async fn test_create_container() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/knowledge_sources"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "src-9" }])))
            .mount(&server)
            .await;

        let spec = ContainerSpec {
            owner_id: "user-1".to_string(),
            agent_id: "agent-1".to_string(),
            label: "Listing from site.test".to_string(),
            kind: "listing".to_string(),
        };
        let id = indexer(&server).create_container(&spec).await.unwrap();
        assert_eq!(id, "src-9");
    }
}
