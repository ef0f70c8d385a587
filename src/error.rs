// src/error.rs
use thiserror::Error;

/// Every way a conversion can fail. The first four are the deterministic
/// parse failures on a malformed export; the rest are plumbing.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid time format at row {row}: {value:?}")]
    InvalidTimeFormat { row: usize, value: String },

    #[error("invalid athlete name at row {row}, column {column}")]
    InvalidName { row: usize, column: usize },

    #[error("missing {field} (column {column}) at row {row}")]
    MissingField {
        row: usize,
        column: usize,
        field: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
