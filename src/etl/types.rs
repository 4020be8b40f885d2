use crate::batch::LoadError;
use crate::source::SourceError;

/// Errors that end a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum ETLError {
    #[error("Source read failed: {0}")]
    Source(#[from] SourceError),

    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Cancellation requested")]
    Cancelled,

    #[error("Reader task failed: {0}")]
    Reader(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<super::config::ConfigBuilderError> for ETLError {
    fn from(err: super::config::ConfigBuilderError) -> Self {
        ETLError::Configuration(err.to_string())
    }
}

impl From<crate::batch::ConfigBuilderError> for ETLError {
    fn from(err: crate::batch::ConfigBuilderError) -> Self {
        ETLError::Configuration(err.to_string())
    }
}
