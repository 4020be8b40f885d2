use async_trait::async_trait;
use std::sync::Arc;

use super::types::{PageId, PaginatedResult};
use crate::retry::RetryPolicy;
use crate::BoxError;

/// Fetches a single page of a paginated source.
///
/// Implementations should be idempotent for a given page id, since callers
/// may fetch the same page again on retry or when a read is restarted.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, page: PageId) -> Result<PaginatedResult, BoxError>;
}

#[async_trait]
impl<F, Fut> PageFetcher for F
where
    F: Fn(PageId) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<PaginatedResult, BoxError>> + Send,
{
    async fn fetch(&self, page: PageId) -> Result<PaginatedResult, BoxError> {
        self(page).await
    }
}

/// Page fetcher that retries failed fetches according to a [`RetryPolicy`].
pub struct RetryingFetcher<P: ?Sized> {
    inner: Arc<P>,
    policy: RetryPolicy,
}

impl<P: PageFetcher + ?Sized> RetryingFetcher<P> {
    pub fn new(inner: Arc<P>, policy: RetryPolicy) -> Self {
        RetryingFetcher { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<P: PageFetcher + ?Sized> PageFetcher for RetryingFetcher<P> {
    async fn fetch(&self, page: PageId) -> Result<PaginatedResult, BoxError> {
        let inner = &self.inner;
        let page = &page;
        self.policy.run(move || inner.fetch(page.clone())).await
    }
}
