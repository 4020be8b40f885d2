pub mod config;
pub mod types;

pub use config::{Config, ConfigBuilder};
pub use types::ETLError;

use futures::{future, stream, Stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, error, info};

use crate::batch::{BatchLoader, BatchSink};
use crate::source::{PageFetcher, PaginatedReader, RetryingFetcher, SourceError, SourceRecord};
use crate::transform::transform;

type SourceItem = Result<SourceRecord, SourceError>;

/// Sums per-batch counts into the total number of loaded records.
///
/// Completes once `counts` completes. The first error is returned instead of
/// a total; no partial count is reported.
pub async fn execute<S, E>(counts: S) -> Result<usize, E>
where
    S: Stream<Item = Result<usize, E>>,
{
    counts
        .try_fold(0usize, |total, count| future::ready(Ok(total + count)))
        .await
}

/// Reads every page of `fetcher`, transforms the records and loads them into
/// `sink` with the default [`Config`].
///
/// Returns the number of records the sink accepted.
pub async fn read_transform_and_load_and_execute<P, K>(
    fetcher: Arc<P>,
    sink: Arc<K>,
) -> Result<usize, ETLError>
where
    P: PageFetcher + ?Sized + 'static,
    K: BatchSink + ?Sized,
{
    Pipeline::new(fetcher, sink, Arc::new(Config::default()))
        .run(&CancellationToken::new())
        .await
}

/// Read, transform and load pipeline from a paginated source into a sink.
///
/// # Stages
///
/// 1. A reader task walks the pages and pushes records into a bounded buffer.
///    When the buffer is full the reader waits, and no further page is
///    fetched until the downstream stages catch up.
/// 2. Records are validated; records with an invalid price are dropped.
/// 3. Valid records are grouped into batches and written to the sink one
///    batch at a time, with the configured retry.
/// 4. Per-batch counts are summed into the run's total.
///
/// Record order is preserved from the source to the sink.
pub struct Pipeline<P: ?Sized, K: ?Sized> {
    fetcher: Arc<P>,
    sink: Arc<K>,
    config: Arc<Config>,
}

impl<P, K> Pipeline<P, K>
where
    P: PageFetcher + ?Sized + 'static,
    K: BatchSink + ?Sized,
{
    pub fn new(fetcher: Arc<P>, sink: Arc<K>, config: Arc<Config>) -> Self {
        Pipeline {
            fetcher,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the pipeline to completion and returns the number of loaded
    /// records.
    ///
    /// Cancelling `cancel`, or dropping the returned future, stops the reader
    /// task and any in-flight fetch or sink write. A cancelled run returns
    /// [`ETLError::Cancelled`].
    pub async fn run(&self, cancel: &CancellationToken) -> Result<usize, ETLError> {
        info!(
            buffer_capacity = self.config.buffer_capacity(),
            batch_size = self.config.batch().batch_size(),
            "starting pipeline"
        );

        let (sender, receiver) = mpsc::channel::<SourceItem>(self.config.buffer_capacity());

        let fetcher = RetryingFetcher::new(Arc::clone(&self.fetcher), self.config.fetch_retry());
        let reader = PaginatedReader::new(Arc::new(fetcher));
        let reader_handle = AbortOnDropHandle::new(tokio::spawn(read(
            reader.records(),
            sender,
            cancel.child_token(),
        )));

        let records = stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|item| (item, receiver))
        });
        let loader = BatchLoader::new(
            Arc::clone(&self.sink),
            Arc::new(self.config.batch().clone()),
        );
        let counts = loader.load_with_retry(transform(records.map_err(ETLError::from)));

        let result = tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(ETLError::Cancelled),
            total = execute(counts) => total,
        };

        match result {
            Ok(total) => {
                reader_handle.await?;
                info!(total, "pipeline finished");
                Ok(total)
            }
            Err(err) => {
                error!(error = %err, "pipeline failed");
                Err(err)
            }
        }
    }
}

async fn read<S>(records: S, sender: mpsc::Sender<SourceItem>, cancel: CancellationToken)
where
    S: Stream<Item = SourceItem>,
{
    tokio::select! {
        _ = cancel.cancelled() => {
            debug!("reader cancelled");
        }
        _ = forward(records, &sender) => {}
    }
}

/// Moves records into the buffer, pulling the next record only once the
/// buffer has room for it.
async fn forward<S>(records: S, sender: &mpsc::Sender<SourceItem>)
where
    S: Stream<Item = SourceItem>,
{
    let mut records = std::pin::pin!(records);

    loop {
        let permit = match sender.reserve().await {
            Ok(permit) => permit,
            Err(_) => {
                debug!("record buffer closed, stopping reader");
                return;
            }
        };

        match records.next().await {
            Some(item) => {
                let failed = item.is_err();
                permit.send(item);
                if failed {
                    return;
                }
            }
            None => return,
        }
    }
}
