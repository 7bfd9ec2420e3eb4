use crate::core::retry::RetryPolicy;
use crate::domain::model::{
    EmployeeCreationRequest, EmployeeDeletionRequest, EmployeeRecord, Envelope,
};
use crate::utils::error::UpstreamError;
use async_trait::async_trait;
use std::time::Duration;

pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;

/// 上游員工記錄 API 的四個遠端操作
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn list_employees(&self) -> UpstreamResult<Envelope<Vec<EmployeeRecord>>>;
    async fn get_employee(&self, id: &str) -> UpstreamResult<Envelope<EmployeeRecord>>;
    async fn create_employee(
        &self,
        request: &EmployeeCreationRequest,
    ) -> UpstreamResult<Envelope<EmployeeRecord>>;
    async fn delete_employee(&self, request: &EmployeeDeletionRequest) -> UpstreamResult<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn listen_addr(&self) -> &str;
    fn upstream_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn retry_policy(&self) -> RetryPolicy;
}
