use std::num::ParseFloatError;
use thiserror::Error;

use crate::source::SourceRecord;

/// A validated record, ready for the sink.
///
/// Only obtainable through [`TryFrom<SourceRecord>`], so `price` is always a
/// successfully parsed number.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    id: String,
    price: f64,
}

impl TargetRecord {
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A source record whose price is not a number.
#[derive(Debug, Error)]
#[error("record '{id}' has invalid price '{price}'")]
pub struct ValidationError {
    pub id: String,
    pub price: String,
    #[source]
    pub source: ParseFloatError,
}

impl TryFrom<SourceRecord> for TargetRecord {
    type Error = ValidationError;

    fn try_from(record: SourceRecord) -> Result<Self, Self::Error> {
        match record.price.trim().parse::<f64>() {
            Ok(price) => Ok(TargetRecord {
                id: record.id,
                price,
            }),
            Err(source) => Err(ValidationError {
                id: record.id,
                price: record.price,
                source,
            }),
        }
    }
}
