use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use icu_model::ModelError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error("{table} table has no column `{column}`")]
    MissingColumn { table: &'static str, column: String },
    #[error("column `{column}` has no value at row {row}")]
    NullValue { column: String, row: usize },
    #[error("column `{column}` row {row}: cannot parse timestamp `{value}`")]
    UnparsableTimestamp {
        column: String,
        row: usize,
        value: String,
    },
    #[error("column `{column}` has unsupported type {dtype}")]
    UnsupportedType { column: String, dtype: String },
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
