//! Reading batch and static tables from disk.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// On-disk table format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Parquet,
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") | Some("tsv") => Self::Csv,
            _ => Self::Parquet,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
        }
    }
}

/// Path of batch `batch_idx` inside a batch directory.
pub fn batch_file(dir: &Path, batch_idx: usize) -> PathBuf {
    dir.join(format!("batch_{batch_idx}.parquet"))
}

/// Read a whole table into memory.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let format = TableFormat::from_path(path);
    let df = match format {
        TableFormat::Parquet => {
            let file = File::open(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            ParquetReader::new(file).finish()?
        }
        TableFormat::Csv => {
            if !path.exists() {
                return Err(IngestError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            let separator = if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"))
            {
                b'\t'
            } else {
                b','
            };
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(1000))
                .map_parse_options(|opts| opts.with_separator(separator))
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()?
        }
    };
    debug!(
        path = %path.display(),
        format = format.extension(),
        rows = df.height(),
        columns = df.width(),
        "read table"
    );
    Ok(df)
}
