use futures::{stream, Stream, StreamExt};
use std::sync::Arc;
use tracing::debug;

use super::config::Config;
use super::sink::BatchSink;
use super::stream::BatchStream;
use super::types::LoadError;
use crate::retry::RetryPolicy;
use crate::transform::TargetRecord;

/// Loads records into `sink` in batches of at most `batch_size`.
///
/// Yields the number of records accepted for every batch, in order. Batches
/// are written one at a time. The first rejected batch ends the stream with
/// [`LoadError::Sink`].
///
/// # Panics
///
/// Panics if `batch_size` is zero.
pub fn load<S, K, E>(
    records: S,
    sink: Arc<K>,
    batch_size: usize,
) -> impl Stream<Item = Result<usize, E>>
where
    S: Stream<Item = Result<TargetRecord, E>>,
    K: BatchSink + ?Sized,
    E: From<LoadError>,
{
    deliver_batches(records, sink, batch_size, RetryPolicy::none())
}

/// Same as [`load`], but every sink call is retried according to `policy`
/// before a rejected batch ends the stream.
///
/// # Panics
///
/// Panics if `batch_size` is zero.
pub fn load_with_retry<S, K, E>(
    records: S,
    sink: Arc<K>,
    batch_size: usize,
    policy: RetryPolicy,
) -> impl Stream<Item = Result<usize, E>>
where
    S: Stream<Item = Result<TargetRecord, E>>,
    K: BatchSink + ?Sized,
    E: From<LoadError>,
{
    deliver_batches(records, sink, batch_size, policy)
}

fn deliver_batches<S, K, E>(
    records: S,
    sink: Arc<K>,
    batch_size: usize,
    policy: RetryPolicy,
) -> impl Stream<Item = Result<usize, E>>
where
    S: Stream<Item = Result<TargetRecord, E>>,
    K: BatchSink + ?Sized,
    E: From<LoadError>,
{
    let batches = Box::pin(BatchStream::wrap(records, batch_size));

    // The state is dropped after the first error, so nothing is pulled or
    // written past a failed batch.
    stream::unfold(Some(batches), move |batches| {
        let sink = Arc::clone(&sink);
        async move {
            let mut batches = batches?;
            let delivered = match batches.next().await? {
                Ok(batch) => deliver(sink.as_ref(), batch, policy).await.map_err(E::from),
                Err(err) => Err(err),
            };
            let next = delivered.is_ok().then_some(batches);
            Some((delivered, next))
        }
    })
}

async fn deliver<K>(
    sink: &K,
    batch: Vec<TargetRecord>,
    policy: RetryPolicy,
) -> Result<usize, LoadError>
where
    K: BatchSink + ?Sized,
{
    let records = batch.as_slice();

    match policy.run(move || sink.write(records)).await {
        Ok(()) => {
            debug!(size = batch.len(), "batch loaded");
            Ok(batch.len())
        }
        Err(source) => Err(LoadError::Sink {
            size: batch.len(),
            attempts: policy.max_retries() + 1,
            source,
        }),
    }
}

/// Writes record streams into a sink according to a batch [`Config`].
pub struct BatchLoader<K: ?Sized> {
    sink: Arc<K>,
    config: Arc<Config>,
}

impl<K: ?Sized> Clone for BatchLoader<K> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            config: self.config.clone(),
        }
    }
}

impl<K> BatchLoader<K>
where
    K: BatchSink + ?Sized,
{
    pub fn new(sink: Arc<K>, config: Arc<Config>) -> Self {
        BatchLoader { sink, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads without retrying; see [`load`].
    pub fn load<S, E>(&self, records: S) -> impl Stream<Item = Result<usize, E>>
    where
        S: Stream<Item = Result<TargetRecord, E>>,
        E: From<LoadError>,
    {
        load(records, Arc::clone(&self.sink), self.config.batch_size())
    }

    /// Loads with the configured retry policy; see [`load_with_retry`].
    pub fn load_with_retry<S, E>(&self, records: S) -> impl Stream<Item = Result<usize, E>>
    where
        S: Stream<Item = Result<TargetRecord, E>>,
        E: From<LoadError>,
    {
        load_with_retry(
            records,
            Arc::clone(&self.sink),
            self.config.batch_size(),
            self.config.retry(),
        )
    }
}
