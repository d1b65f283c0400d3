use thiserror::Error;

/// Convenience result type for ingestion, configuration and export operations.
pub type ProfilingResult<T> = Result<T, ProfilingError>;

/// Error type returned by the fallible parts of the crate.
///
/// Classification and profiling themselves never fail; this enum covers the collaborators
/// around them (file readers, exporters, option loading, thread pool setup).
#[derive(Debug, Error)]
pub enum ProfilingError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV read or write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse or serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Invalid glob pattern passed to input discovery.
    #[error("invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The worker pool for parallel profiling could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The input format could not be determined or is not enabled.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// A source value does not fit the [`crate::types::RawValue`] shape (nested arrays,
    /// structs, lists, ...).
    #[error("invalid input at row {row} column '{column}': {message}")]
    InvalidInput {
        row: usize,
        column: String,
        message: String,
    },

    /// The input is structurally unusable (no header row, empty document, ...).
    #[error("malformed input: {message}")]
    Malformed { message: String },

    /// Options failed validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
