use std::time::Duration;

use storefront_core::config::ClientConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }

    /// Delay before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use storefront_core::config::AppConfig;

    use super::RetryPolicy;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(0), Duration::from_millis(250));
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(4), Duration::from_millis(4_000));
        assert_eq!(policy.backoff(5), Duration::from_millis(5_000));
        assert_eq!(policy.backoff(60), Duration::from_millis(5_000));
    }

    #[test]
    fn policy_follows_client_config() {
        let mut config = AppConfig::default().client;
        config.max_retries = 0;
        config.retry_base_delay_ms = 10;
        config.retry_max_delay_ms = 20;

        let policy = RetryPolicy::from_config(&config);

        assert_eq!(policy, RetryPolicy { max_retries: 0, base_delay_ms: 10, max_delay_ms: 20 });
        assert_eq!(policy.backoff(3), Duration::from_millis(20));
    }
}
