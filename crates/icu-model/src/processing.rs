use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ids::PatientId;

/// Why a patient produced no label rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// An input table for the batch is absent on disk.
    MissingFile,
    /// The imputed or endpoint slice has no rows.
    EmptySeries,
    /// Imputed and endpoint timestamps do not match 1:1.
    Alignment,
    /// The patient's slice could not be converted into typed series.
    ReadError,
}

impl SkipReason {
    pub const ALL: [SkipReason; 4] = [
        Self::MissingFile,
        Self::EmptySeries,
        Self::Alignment,
        Self::ReadError,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::EmptySeries => "empty_series",
            Self::Alignment => "alignment",
            Self::ReadError => "read_error",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPatient {
    pub patient_id: PatientId,
    pub reason: SkipReason,
    pub detail: String,
}

/// Outcome of labelling one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_idx: usize,
    pub patients_total: usize,
    pub patients_labeled: usize,
    pub rows_written: usize,
    pub skipped: Vec<SkippedPatient>,
    pub output_path: Option<PathBuf>,
}

impl BatchReport {
    pub fn new(batch_idx: usize) -> Self {
        Self {
            batch_idx,
            ..Self::default()
        }
    }

    pub fn record_skip(
        &mut self,
        patient_id: PatientId,
        reason: SkipReason,
        detail: impl Into<String>,
    ) {
        self.skipped.push(SkippedPatient {
            patient_id,
            reason,
            detail: detail.into(),
        });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn skipped_with(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}
