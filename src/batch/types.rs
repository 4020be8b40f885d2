use thiserror::Error;

use crate::BoxError;

/// Errors that can occur while loading batches into a sink.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The sink rejected a batch and the retry budget is spent.
    ///
    /// Preserves the error of the last attempt.
    #[error("sink rejected batch of {size} record(s) after {attempts} attempt(s)")]
    Sink {
        size: usize,
        attempts: usize,
        #[source]
        source: BoxError,
    },
}
