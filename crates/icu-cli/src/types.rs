use std::path::PathBuf;

use icu_model::BatchReport;

#[derive(Debug)]
pub struct BatchResult {
    pub report: BatchReport,
    pub dry_run: bool,
    /// Options file the run was configured from, if any.
    pub config: Option<PathBuf>,
}
