/// Data layer: core types, loading, caching, filtering, and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → VehicleDataset
///   └──────────┘
///        │            (memoized per source path by `cache`)
///        ▼
///   ┌──────────────┐
///   │ VehicleDataset│  Vec<Listing>, category index, price bounds
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  type + price predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  count, means, histogram, box statistics
///   └──────────┘
/// ```
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while bringing a dataset into memory.
/// All variants are fatal to the load; there is no retry or fallback.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: {message}")]
    BadRecord { row: usize, message: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, DataError>;
