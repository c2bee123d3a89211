use super::payload::{http_failure, parse_search_payload, parse_validation_payload};
use super::LeadsBackend;
use crate::domain::error::{AppError, Result};
use crate::domain::search::{BackendStatus, SearchPage, SearchRequest, ValidationAnswer};
use crate::domain::workflow_config::WorkflowConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const SEARCH_PATH: &str = "/api/run";
const VALIDATE_PATH: &str = "/api/validate";
const STATUS_PATH: &str = "/api/status";

pub struct HttpLeadsBackend {
    client: reqwest::Client,
    config: WorkflowConfig,
}

impl HttpLeadsBackend {
    pub fn new(config: &WorkflowConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::RemoteError(format!("Failed to read response: {}", e)))?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            return Err(http_failure(status.as_u16(), body.as_ref()));
        }

        body.ok_or_else(|| AppError::RemoteError("Failed to parse JSON response".to_string()))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::RemoteError(format!("Request failed: {}", e)))?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl LeadsBackend for HttpLeadsBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let body = json!({
            "city": request.city,
            "segment": request.segment,
            "total": request.total,
        });
        let json = self.post_json(SEARCH_PATH, &body).await?;
        parse_search_payload(&json)
    }

    async fn validate(&self, numbers: &[String]) -> Result<Vec<ValidationAnswer>> {
        let json = self
            .post_json(VALIDATE_PATH, &json!({ "numbers": numbers }))
            .await?;
        parse_validation_payload(&json)
    }

    async fn status(&self) -> Result<BackendStatus> {
        let url = self.config.endpoint(STATUS_PATH);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::RemoteError(format!("Request failed: {}", e)))?;
        let json = Self::read_json(response).await?;
        serde_json::from_value(json)
            .map_err(|e| AppError::RemoteError(format!("Invalid status response: {}", e)))
    }
}
