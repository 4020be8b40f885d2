//! In-memory collaborators shared by the unit tests.
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::batch::BatchSink;
use crate::source::{PageFetcher, PageId, PaginatedResult, SourceRecord};
use crate::transform::TargetRecord;
use crate::BoxError;

/// Builds records `<prefix>-0`, `<prefix>-1`, ... with the given prices.
pub fn records(prefix: &str, prices: &[&str]) -> Vec<SourceRecord> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| SourceRecord::new(format!("{}-{}", prefix, i), *price))
        .collect()
}

pub fn page_id(index: usize) -> PageId {
    if index == 0 {
        PageId::First
    } else {
        PageId::cursor(format!("page-{}", index))
    }
}

fn page_index(page: &PageId) -> Result<usize, BoxError> {
    match page {
        PageId::First => Ok(0),
        PageId::Cursor(token) => token
            .strip_prefix("page-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| -> BoxError { format!("unknown cursor '{}'", token).into() }),
    }
}

/// A source serving fixed pages chained through `page-<n>` cursors.
pub struct PagedSource {
    pages: Vec<Vec<SourceRecord>>,
    failing_page: Option<usize>,
    failures_left: AtomicUsize,
    fetch_count: AtomicUsize,
    fetched: Mutex<Vec<PageId>>,
}

impl PagedSource {
    pub fn new(pages: Vec<Vec<SourceRecord>>) -> Self {
        PagedSource {
            pages,
            failing_page: None,
            failures_left: AtomicUsize::new(0),
            fetch_count: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Makes every fetch of `page` fail.
    pub fn failing_at(self, page: usize) -> Self {
        self.failing_times(page, usize::MAX)
    }

    /// Makes the first `times` fetches of `page` fail.
    pub fn failing_times(mut self, page: usize, times: usize) -> Self {
        self.failing_page = Some(page);
        self.failures_left = AtomicUsize::new(times);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub async fn fetched(&self) -> Vec<PageId> {
        self.fetched.lock().await.clone()
    }
}

#[async_trait]
impl PageFetcher for PagedSource {
    async fn fetch(&self, page: PageId) -> Result<PaginatedResult, BoxError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().await.push(page.clone());

        let index = page_index(&page)?;
        if self.failing_page == Some(index) {
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if failing {
                return Err(format!("page {} unavailable", page).into());
            }
        }

        let results = self.pages.get(index).cloned().unwrap_or_default();
        let next_page = if index + 1 < self.pages.len() {
            Some(page_id(index + 1))
        } else {
            None
        };
        Ok(PaginatedResult::new(results, next_page))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkBehavior {
    Accept,
    /// Rejects the first write of every batch, accepts the repeat.
    FailFirstAttempt,
    AlwaysFail,
    /// Never completes a write.
    Stall,
}

/// A sink that records accepted batches and every call made to it.
pub struct RecordingSink {
    behavior: SinkBehavior,
    calls: AtomicUsize,
    seen: Mutex<HashSet<String>>,
    batches: Mutex<Vec<Vec<TargetRecord>>>,
}

impl RecordingSink {
    pub fn new(behavior: SinkBehavior) -> Self {
        RecordingSink {
            behavior,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(HashSet::new()),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn batches(&self) -> Vec<Vec<TargetRecord>> {
        self.batches.lock().await.clone()
    }

    pub async fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().await.iter().map(Vec::len).collect()
    }

    pub async fn loaded_ids(&self) -> Vec<String> {
        self.batches
            .lock()
            .await
            .iter()
            .flatten()
            .map(|record| record.id().to_string())
            .collect()
    }
}

#[async_trait]
impl BatchSink for RecordingSink {
    async fn write(&self, batch: &[TargetRecord]) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            SinkBehavior::Accept => {}
            SinkBehavior::FailFirstAttempt => {
                let key = batch.first().map(|r| r.id().to_string()).unwrap_or_default();
                if self.seen.lock().await.insert(key) {
                    return Err("sink temporarily unavailable".into());
                }
            }
            SinkBehavior::AlwaysFail => return Err("sink unavailable".into()),
            SinkBehavior::Stall => futures::future::pending::<()>().await,
        }

        self.batches.lock().await.push(batch.to_vec());
        Ok(())
    }
}
