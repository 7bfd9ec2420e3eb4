pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::retry::{RetryPolicy, DEFAULT_MAX_BACKOFF_MS, DEFAULT_POLICY_NAME};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_service_settings, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "employee-facade")]
#[command(about = "Employee management facade over an upstream employee API")]
pub struct CliConfig {
    #[arg(long, env = "FACADE_LISTEN_ADDR", default_value = "127.0.0.1:8111")]
    pub listen_addr: String,

    #[arg(long, env = "EMPLOYEE_API_URL", default_value = "http://localhost:8112/api/v1")]
    pub upstream_url: String,

    #[arg(long, env = "EMPLOYEE_API_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    #[arg(long, env = "EMPLOYEE_API_RETRY_ATTEMPTS", default_value = "3")]
    pub retry_attempts: u32,

    #[arg(long, env = "EMPLOYEE_API_RETRY_BACKOFF_MS", default_value = "1000")]
    pub retry_backoff_ms: u64,

    #[arg(long, default_value = "2.0")]
    pub retry_backoff_multiplier: f64,

    /// Path to a TOML configuration file; overrides the server and upstream flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            DEFAULT_POLICY_NAME,
            self.retry_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
        .with_multiplier(self.retry_backoff_multiplier)
        .with_max_backoff(Duration::from_millis(DEFAULT_MAX_BACKOFF_MS))
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_service_settings(
            &self.listen_addr,
            &self.upstream_url,
            self.request_timeout_secs,
            self.retry_attempts,
            self.retry_backoff_multiplier,
        )
    }
}
