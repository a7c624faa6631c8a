use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use icu_ingest::IngestError;
use icu_model::PatientId;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    /// Label rows must match the patient's imputed rows one to one.
    #[error("patient {patient_id}: {labels} label rows for {rows} imputed rows")]
    RowCount {
        patient_id: PatientId,
        labels: usize,
        rows: usize,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
