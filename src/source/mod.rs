pub mod fetcher;
pub mod reader;
pub mod types;

pub use fetcher::{PageFetcher, RetryingFetcher};
pub use reader::{read_from_paginated_datasource, PaginatedReader};
pub use types::{PageId, PaginatedResult, SourceError, SourceRecord};
