use futures::future;
use futures::{Stream, TryStreamExt};

use super::types::TargetRecord;
use crate::source::SourceRecord;

/// Converts source records into target records, dropping invalid ones.
///
/// Records whose price does not parse are skipped without failing the
/// stream. Upstream errors are passed through unchanged. Order is preserved.
pub fn transform<S, E>(records: S) -> impl Stream<Item = Result<TargetRecord, E>>
where
    S: Stream<Item = Result<SourceRecord, E>>,
{
    records.try_filter_map(|record| future::ready(Ok(TargetRecord::try_from(record).ok())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{stream, StreamExt};

    #[tokio::test]
    async fn test_drops_exactly_the_invalid_records() {
        let input = vec![
            SourceRecord::new("1", "10.0"),
            SourceRecord::new("2", "oops"),
            SourceRecord::new("3", "30"),
            SourceRecord::new("4", ""),
            SourceRecord::new("5", "5.5"),
        ];

        let output: Vec<TargetRecord> =
            transform(stream::iter(input.into_iter().map(Ok::<_, String>)))
                .try_collect()
                .await
                .unwrap();

        let ids: Vec<&str> = output.iter().map(|r| r.id()).collect();
        let prices: Vec<f64> = output.iter().map(|r| r.price()).collect();
        assert_eq!(ids, vec!["1", "3", "5"]);
        assert_eq!(prices, vec![10.0, 30.0, 5.5]);
    }

    #[tokio::test]
    async fn test_all_invalid_yields_empty_stream() {
        let input = vec![SourceRecord::new("1", "x"), SourceRecord::new("2", "y")];

        let output: Vec<TargetRecord> =
            transform(stream::iter(input.into_iter().map(Ok::<_, String>)))
                .try_collect()
                .await
                .unwrap();

        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_passes_through() {
        let input = vec![
            Ok(SourceRecord::new("1", "1")),
            Err("fetch failed".to_string()),
        ];

        let output: Vec<Result<TargetRecord, String>> =
            transform(stream::iter(input)).collect().await;

        assert_eq!(output.len(), 2);
        assert_eq!(output[0].as_ref().unwrap().id(), "1");
        assert_eq!(output[1].as_ref().unwrap_err(), "fetch failed");
    }
}
