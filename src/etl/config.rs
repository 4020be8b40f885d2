use derive_builder::Builder;

use crate::batch;
use crate::retry::RetryPolicy;

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Config {
    /// Number of records buffered between the reader and the transformer
    #[builder(default = "10")]
    pub(crate) buffer_capacity: usize,

    /// Batch size and sink retry settings
    #[builder(default)]
    pub(crate) batch: batch::Config,

    /// Retry applied to each page fetch
    #[builder(default = "RetryPolicy::none()")]
    pub(crate) fetch_retry: RetryPolicy,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.buffer_capacity == Some(0) {
            return Err("buffer_capacity must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Config {
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    #[inline]
    pub fn batch(&self) -> &batch::Config {
        &self.batch
    }

    #[inline]
    pub fn fetch_retry(&self) -> RetryPolicy {
        self.fetch_retry
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_capacity: 10,
            batch: batch::Config::default(),
            fetch_retry: RetryPolicy::none(),
        }
    }
}
