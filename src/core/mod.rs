pub mod retry;
pub mod service;
pub mod validator;

pub use crate::domain::model::{EmployeeCreationRequest, EmployeeRecord, FieldBag, FieldValue};
pub use crate::domain::ports::{ConfigProvider, UpstreamClient};
pub use crate::utils::error::Result;
pub use retry::{with_retry, RetryPolicy};
pub use service::{AggregationService, TOP_EARNERS_LIMIT};
