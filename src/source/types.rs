use std::fmt;
use thiserror::Error;

use crate::BoxError;

/// One raw record as delivered by the source.
///
/// `price` is text because the source does not guarantee it is numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub id: String,
    pub price: String,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, price: impl Into<String>) -> Self {
        SourceRecord {
            id: id.into(),
            price: price.into(),
        }
    }
}

/// Opaque cursor identifying a page of the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageId {
    /// The first page of any source.
    First,
    /// A cursor handed out by the source in `next_page`.
    Cursor(String),
}

impl PageId {
    pub fn cursor(token: impl Into<String>) -> Self {
        PageId::Cursor(token.into())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageId::First => f.write_str("<first>"),
            PageId::Cursor(token) => f.write_str(token),
        }
    }
}

/// One page of results. `next_page == None` marks the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult {
    pub results: Vec<SourceRecord>,
    pub next_page: Option<PageId>,
}

impl PaginatedResult {
    pub fn new(results: Vec<SourceRecord>, next_page: Option<PageId>) -> Self {
        PaginatedResult { results, next_page }
    }

    pub fn last(results: Vec<SourceRecord>) -> Self {
        PaginatedResult {
            results,
            next_page: None,
        }
    }
}

/// Errors raised while reading from the source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Fetching a page failed. The read stops here.
    #[error("failed to fetch page {page}")]
    Fetch {
        page: PageId,
        #[source]
        source: BoxError,
    },
}
