//! Persisting a batch's label frame.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use icu_ingest::TableFormat;

use crate::error::{OutputError, Result};

/// Path of the label file for `batch_idx`.
pub fn label_file(dir: &Path, batch_idx: usize, format: TableFormat) -> PathBuf {
    dir.join(format!("batch_{batch_idx}.{}", format.extension()))
}

/// Remove a previous output file. Returns whether one existed.
pub fn remove_existing(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|source| OutputError::Io {
        action: "remove",
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "removed previous output");
    Ok(true)
}

/// Write the label frame, creating the parent directory when needed.
pub fn write_labels(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|source| OutputError::Io {
        action: "create",
        path: path.to_path_buf(),
        source,
    })?;
    match TableFormat::from_path(path) {
        TableFormat::Parquet => {
            ParquetWriter::new(file).finish(df)?;
        }
        TableFormat::Csv => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
    }
    info!(path = %path.display(), rows = df.height(), "labels written");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
