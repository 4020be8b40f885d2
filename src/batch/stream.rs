use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream, TryStream};
use pin_project_lite::pin_project;

pin_project! {
    /// A stream adapter that groups items into consecutive batches.
    ///
    /// Batches never overlap and always hold `batch_size` items, except the
    /// last one, which holds whatever is left when the inner stream ends. An
    /// empty inner stream yields no batch at all.
    ///
    /// An error from the inner stream is yielded as is and ends this stream;
    /// the partially filled batch is discarded.
    #[must_use = "streams do nothing unless polled"]
    pub struct BatchStream<S: TryStream> {
        #[pin]
        stream: S,
        items: Vec<S::Ok>,
        batch_size: usize,
        inner_stream_ended: bool,
    }
}

impl<S: TryStream> BatchStream<S> {
    /// Wraps `stream`, grouping its items by `batch_size`.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn wrap(stream: S, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be greater than zero");

        BatchStream {
            stream,
            items: Vec::with_capacity(batch_size),
            batch_size,
            inner_stream_ended: false,
        }
    }
}

impl<S: TryStream> Stream for BatchStream<S> {
    type Item = Result<Vec<S::Ok>, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.inner_stream_ended {
            return Poll::Ready(None);
        }

        loop {
            match ready!(this.stream.as_mut().try_poll_next(cx)) {
                Some(Ok(item)) => {
                    this.items.push(item);

                    if this.items.len() >= *this.batch_size {
                        let batch =
                            std::mem::replace(this.items, Vec::with_capacity(*this.batch_size));
                        return Poll::Ready(Some(Ok(batch)));
                    }
                }
                Some(Err(err)) => {
                    *this.inner_stream_ended = true;
                    this.items.clear();
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    *this.inner_stream_ended = true;

                    if this.items.is_empty() {
                        return Poll::Ready(None);
                    }
                    return Poll::Ready(Some(Ok(std::mem::take(this.items))));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.inner_stream_ended {
            return (0, Some(0));
        }

        let pending = self.items.len();
        let (lower, upper) = self.stream.size_hint();
        let lower = lower.saturating_add(pending) / self.batch_size;
        let upper = upper
            .and_then(|upper| upper.checked_add(pending))
            .map(|total| total.div_ceil(self.batch_size));
        (lower, upper)
    }
}
