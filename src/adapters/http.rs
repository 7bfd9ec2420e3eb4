use crate::domain::model::{
    EmployeeCreationRequest, EmployeeDeletionRequest, EmployeeRecord, Envelope,
};
use crate::domain::ports::{UpstreamClient, UpstreamResult};
use crate::utils::error::{FacadeError, Result, UpstreamError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// 透過 reqwest 呼叫上游員工 API
#[derive(Debug, Clone)]
pub struct ReqwestEmployeeClient {
    client: Client,
    base_url: Url,
}

impl ReqwestEmployeeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FacadeError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| FacadeError::InvalidConfigValueError {
            field: "upstream_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(FacadeError::InvalidConfigValueError {
                field: "upstream_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 在 base URL 之後逐段附加路徑，每段都會做百分號編碼
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl UpstreamClient for ReqwestEmployeeClient {
    async fn list_employees(&self) -> UpstreamResult<Envelope<Vec<EmployeeRecord>>> {
        let url = self.endpoint(&["employee"]);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        decode_envelope(ensure_success(response)?).await
    }

    async fn get_employee(&self, id: &str) -> UpstreamResult<Envelope<EmployeeRecord>> {
        let url = self.endpoint(&["employee", id]);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;

        // 上游以 404 表示查無此人，視為 data 不存在
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Upstream has no employee with id {}", id);
            return Ok(Envelope::new(StatusCode::NOT_FOUND.to_string(), None));
        }

        decode_envelope(ensure_success(response)?).await
    }

    async fn create_employee(
        &self,
        request: &EmployeeCreationRequest,
    ) -> UpstreamResult<Envelope<EmployeeRecord>> {
        let url = self.endpoint(&["employee"]);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.post(url).json(request).send().await?;
        decode_envelope(ensure_success(response)?).await
    }

    async fn delete_employee(&self, request: &EmployeeDeletionRequest) -> UpstreamResult<String> {
        let url = self.endpoint(&["employee"]);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.delete(url).json(request).send().await?;
        Ok(ensure_success(response)?.text().await?)
    }
}

fn ensure_success(response: Response) -> UpstreamResult<Response> {
    let status = response.status();
    tracing::debug!("API response status: {}", status);

    if status.is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::Status(status))
    }
}

// 先讀成文字再解析，讓格式錯誤落在 Decode 而非 Transport
async fn decode_envelope<T: DeserializeOwned>(response: Response) -> UpstreamResult<Envelope<T>> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
