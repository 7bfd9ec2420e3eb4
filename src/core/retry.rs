use crate::domain::ports::UpstreamResult;
use crate::utils::error::{FacadeError, Result, UpstreamError};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_POLICY_NAME: &str = "upstream-read";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;

/// 具名的重試策略，只套用在讀取操作上
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub name: String,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub backoff_multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            name: DEFAULT_POLICY_NAME.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(name: &str, max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            name: name.to_string(),
            max_attempts,
            initial_backoff,
            ..Self::default()
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// 第 `attempt` 次失敗後（從 1 起算）要等待的時間
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        Duration::try_from_secs_f64(secs)
            .map(|delay| delay.min(self.max_backoff))
            .unwrap_or(self.max_backoff)
    }
}

/// 以 `policy` 重試 `operation`，全部失敗後把最後一個上游錯誤交給 `fallback`。
///
/// 至少執行一次；最後一次失敗後不再等待。呼叫端永遠不會看到原始的上游錯誤。
pub async fn with_retry<T, Op, Fut, Fb>(
    policy: &RetryPolicy,
    mut operation: Op,
    fallback: Fb,
) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = UpstreamResult<T>>,
    Fb: FnOnce(UpstreamError) -> FacadeError,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(
                        policy = %policy.name,
                        attempt,
                        "Upstream call succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(
                    policy = %policy.name,
                    attempt,
                    max_attempts,
                    "⚠️ Upstream call failed: {}",
                    e
                );

                if attempt >= max_attempts {
                    tracing::error!(
                        policy = %policy.name,
                        "❌ Retry attempts exhausted, invoking fallback"
                    );
                    return Err(fallback(e));
                }

                tokio::time::sleep(policy.backoff_for(attempt)).await;
                attempt += 1;
            }
        }
    }
}
