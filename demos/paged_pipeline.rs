//! Paged pipeline example: reads an in-memory paginated catalogue, drops
//! records with unparsable prices and loads the rest into a flaky sink.
//!
//! Run with: cargo run --example paged_pipeline

use async_trait::async_trait;
use paged_etl::batch::{self, BatchSink};
use paged_etl::etl::{self, ETLError, Pipeline};
use paged_etl::retry::RetryPolicy;
use paged_etl::source::{PageFetcher, PageId, PaginatedResult, SourceRecord};
use paged_etl::transform::TargetRecord;
use paged_etl::BoxError;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const PAGE_COUNT: usize = 4;
const PAGE_SIZE: usize = 6;

/// Serves `PAGE_COUNT` pages, every fourth record carrying a broken price
struct CatalogueSource;

#[async_trait]
impl PageFetcher for CatalogueSource {
    async fn fetch(&self, page: PageId) -> Result<PaginatedResult, BoxError> {
        let index = match &page {
            PageId::First => 0,
            PageId::Cursor(token) => token.parse::<usize>()?,
        };

        // Simulate network latency
        tokio::time::sleep(Duration::from_millis(20)).await;

        let results = (0..PAGE_SIZE)
            .map(|i| {
                let n = index * PAGE_SIZE + i;
                let price = if n % 4 == 3 {
                    "n/a".to_string()
                } else {
                    format!("{}.99", n)
                };
                SourceRecord::new(format!("item-{}", n), price)
            })
            .collect();
        let next_page = (index + 1 < PAGE_COUNT).then(|| PageId::cursor((index + 1).to_string()));

        Ok(PaginatedResult::new(results, next_page))
    }
}

/// Sink that rejects roughly a third of the writes
struct FlakySink;

#[async_trait]
impl BatchSink for FlakySink {
    async fn write(&self, batch: &[TargetRecord]) -> Result<(), BoxError> {
        tokio::time::sleep(Duration::from_millis(50)).await;

        if rand::thread_rng().gen_bool(0.3) {
            return Err("sink temporarily unavailable".into());
        }

        let ids: Vec<&str> = batch.iter().map(|r| r.id()).collect();
        println!("Stored batch of {} records: {:?}", batch.len(), ids);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), ETLError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("paged_etl=debug")),
        )
        .init();

    let batch_config = batch::ConfigBuilder::default()
        .batch_size(5usize)
        .retry(RetryPolicy::new(5, Duration::from_millis(100)))
        .build()?;
    let config = etl::ConfigBuilder::default()
        .buffer_capacity(10usize)
        .batch(batch_config)
        .build()?;

    println!("Starting paged pipeline...");
    println!("- Pages: {} x {} records", PAGE_COUNT, PAGE_SIZE);
    println!("- Batch size: {}", config.batch().batch_size());
    println!("- Buffer capacity: {}\n", config.buffer_capacity());

    let pipeline = Pipeline::new(
        Arc::new(CatalogueSource),
        Arc::new(FlakySink),
        Arc::new(config),
    );
    let cancel = CancellationToken::new();

    let cancel_on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_ctrl_c.cancel();
        }
    });

    let total = pipeline.run(&cancel).await?;

    println!("\nPipeline completed, {} records loaded", total);
    Ok(())
}
