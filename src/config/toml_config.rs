use crate::core::retry::{
    RetryPolicy, DEFAULT_BACKOFF_MS, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_BACKOFF_MS, DEFAULT_POLICY_NAME,
};
use crate::core::ConfigProvider;
use crate::utils::error::{FacadeError, Result};
use crate::utils::validation::{validate_positive_number, validate_service_settings, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8111";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub retry: Option<RetryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub name: Option<String>,
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
    pub backoff_multiplier: Option<f64>,
    pub max_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FacadeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMPLOYEE_API_URL})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<regex::Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            regex::Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.upstream
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn listen_addr(&self) -> &str {
        &self.server.listen_addr
    }

    fn upstream_url(&self) -> &str {
        &self.upstream.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn retry_policy(&self) -> RetryPolicy {
        let retry = self.upstream.retry.as_ref();

        RetryPolicy::new(
            retry
                .and_then(|r| r.name.as_deref())
                .unwrap_or(DEFAULT_POLICY_NAME),
            retry
                .and_then(|r| r.attempts)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            Duration::from_millis(
                retry
                    .and_then(|r| r.delay_ms)
                    .unwrap_or(DEFAULT_BACKOFF_MS),
            ),
        )
        .with_multiplier(
            retry
                .and_then(|r| r.backoff_multiplier)
                .unwrap_or(DEFAULT_BACKOFF_MULTIPLIER),
        )
        .with_max_backoff(Duration::from_millis(
            retry
                .and_then(|r| r.max_delay_ms)
                .unwrap_or(DEFAULT_MAX_BACKOFF_MS),
        ))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let policy = self.retry_policy();
        validate_service_settings(
            &self.server.listen_addr,
            &self.upstream.base_url,
            self.timeout_seconds(),
            policy.max_attempts,
            policy.backoff_multiplier,
        )?;

        // 上限不可低於初始等待時間，也不可為 0
        if let Some(retry) = &self.upstream.retry {
            if let Some(max_delay_ms) = retry.max_delay_ms {
                let delay_ms = retry.delay_ms.unwrap_or(DEFAULT_BACKOFF_MS);
                validate_positive_number("max_delay_ms", max_delay_ms, delay_ms.max(1))?;
            }
        }

        Ok(())
    }
}
