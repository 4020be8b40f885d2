// src/batch/config.rs

use derive_builder::Builder;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Config {
    /// Maximum number of records handed to the sink in one call
    #[builder(default = "5")]
    pub(crate) batch_size: usize,

    /// Retry applied to each sink call when loading with retry
    #[builder(default)]
    pub(crate) retry: RetryPolicy,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == Some(0) {
            return Err("batch_size must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Config {
    /// Returns the maximum batch size
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the retry policy used for sink calls
    #[inline]
    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            batch_size: 5,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::default().build().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.batch_size(), 5);
        assert_eq!(config.retry().max_retries(), 5);
        assert_eq!(config.retry().delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = ConfigBuilder::default().batch_size(0usize).build();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("batch_size must be greater than zero"));
    }

    #[test]
    fn test_custom_retry() {
        let config = ConfigBuilder::default()
            .batch_size(2usize)
            .retry(RetryPolicy::none())
            .build()
            .unwrap();

        assert_eq!(config.batch_size(), 2);
        assert_eq!(config.retry(), RetryPolicy::none());
    }
}
