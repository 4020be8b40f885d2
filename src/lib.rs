//! # paged-etl
//!
//! A backpressured streaming ETL pipeline built on Tokio: records are read
//! from a paginated source, validated, grouped into fixed-size batches and
//! written to a sink with bounded retry.
//!
//! ## Features
//!
//! - **Lazy pagination**: pages are fetched only as records are consumed
//! - **Backpressure** via a bounded channel between reader and loader
//! - **Tumbling batches** with per-batch retry on sink failure
//! - **Graceful cancellation** through a [`CancellationToken`](tokio_util::sync::CancellationToken)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paged_etl::etl::read_transform_and_load_and_execute;
//! use std::sync::Arc;
//!
//! // `fetcher` implements `PageFetcher`, `sink` implements `BatchSink`
//! let total = read_transform_and_load_and_execute(Arc::new(fetcher), Arc::new(sink)).await?;
//! println!("loaded {} records", total);
//! ```
//!
//! ## Modules
//!
//! - [`source`] - Paginated source access and the record stream
//! - [`transform`] - Validation of source records
//! - [`batch`] - Batching and delivery to the sink
//! - [`retry`] - Bounded retry with a fixed delay
//! - [`etl`] - The composed pipeline

pub mod batch;
pub mod etl;
pub mod retry;
pub mod source;
pub mod transform;

#[cfg(test)]
mod test_utils;

/// Error type returned by page fetchers and sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
