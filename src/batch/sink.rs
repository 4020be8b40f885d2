// src/batch/sink.rs

use async_trait::async_trait;

use crate::transform::TargetRecord;
use crate::BoxError;

/// Destination for batches of target records.
///
/// A write either persists the whole batch or fails as a whole. The same
/// batch may be written again when the loader retries, so writes should be
/// safe to repeat.
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn write(&self, batch: &[TargetRecord]) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> BatchSink for F
where
    F: Fn(Vec<TargetRecord>) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<(), BoxError>> + Send,
{
    async fn write(&self, batch: &[TargetRecord]) -> Result<(), BoxError> {
        self(batch.to_vec()).await
    }
}
