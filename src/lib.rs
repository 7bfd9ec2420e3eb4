pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ReqwestEmployeeClient;
pub use config::toml_config::TomlConfig;
pub use crate::core::{retry::RetryPolicy, service::AggregationService};
pub use utils::error::{FacadeError, Result, UpstreamError, ValidationFailure};
