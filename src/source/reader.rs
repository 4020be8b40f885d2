use futures::{stream, Stream};
use std::sync::Arc;
use tracing::debug;

use super::fetcher::PageFetcher;
use super::types::{PageId, SourceError, SourceRecord};

/// Cursor state of a paginated read.
enum ReadState {
    /// The next page to request.
    Fetch(PageId),
    /// Records of the current page still to hand out, and where to go after.
    Emit {
        records: std::vec::IntoIter<SourceRecord>,
        next: Option<PageId>,
    },
    Done,
}

/// Flattens a paginated source into a lazy stream of records.
///
/// Starts at [`PageId::First`] and follows `next_page` until a page without
/// one is returned. A page is only requested once every record of the
/// previous page has been pulled, so a slow consumer slows down fetching.
///
/// A failed fetch ends the stream with [`SourceError::Fetch`]. There is no
/// retry here; wrap the fetcher in a
/// [`RetryingFetcher`](super::fetcher::RetryingFetcher) for that. A source
/// that never stops handing out `next_page` yields an endless stream.
pub fn read_from_paginated_datasource<P>(
    fetcher: Arc<P>,
) -> impl Stream<Item = Result<SourceRecord, SourceError>> + Send + 'static
where
    P: PageFetcher + ?Sized + 'static,
{
    stream::try_unfold(ReadState::Fetch(PageId::First), move |state| {
        let fetcher = Arc::clone(&fetcher);
        async move { advance(fetcher.as_ref(), state).await }
    })
}

/// Steps the cursor until the next record is available or the source ends.
async fn advance<P>(
    fetcher: &P,
    mut state: ReadState,
) -> Result<Option<(SourceRecord, ReadState)>, SourceError>
where
    P: PageFetcher + ?Sized,
{
    loop {
        state = match state {
            ReadState::Fetch(page) => {
                let result = match fetcher.fetch(page.clone()).await {
                    Ok(result) => result,
                    Err(source) => return Err(SourceError::Fetch { page, source }),
                };
                debug!(
                    page = %page,
                    records = result.results.len(),
                    has_next = result.next_page.is_some(),
                    "fetched page"
                );
                ReadState::Emit {
                    records: result.results.into_iter(),
                    next: result.next_page,
                }
            }
            ReadState::Emit { mut records, next } => match records.next() {
                Some(record) => return Ok(Some((record, ReadState::Emit { records, next }))),
                None => match next {
                    Some(page) => ReadState::Fetch(page),
                    None => ReadState::Done,
                },
            },
            ReadState::Done => return Ok(None),
        };
    }
}

/// Reusable handle on a paginated source.
///
/// Every call to [`records`](Self::records) starts a new read from the first
/// page; nothing is cached between reads.
pub struct PaginatedReader<P: ?Sized> {
    fetcher: Arc<P>,
}

impl<P: ?Sized> Clone for PaginatedReader<P> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<P> PaginatedReader<P>
where
    P: PageFetcher + ?Sized + 'static,
{
    pub fn new(fetcher: Arc<P>) -> Self {
        PaginatedReader { fetcher }
    }

    pub fn records(&self) -> impl Stream<Item = Result<SourceRecord, SourceError>> + Send + 'static {
        read_from_paginated_datasource(Arc::clone(&self.fetcher))
    }
}
