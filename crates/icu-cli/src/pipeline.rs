//! Batch labelling pipeline with explicit stages.
//!
//! 1. **Prepare**: remove a previous output file unless this is a dry run
//! 2. **Load**: severity maps, static table, imputed and endpoint batch tables
//! 3. **Label**: assemble every patient of the batch, skipping unusable ones
//! 4. **Write**: persist the combined label frame
//!
//! Each stage takes the output of the previous one and returns typed results.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use polars::prelude::DataFrame;
use tracing::{debug, debug_span, info, info_span, warn};

use icu_ingest::{
    ImputedSchema, IngestError, PatientBatch, StaticTable, TableFormat, batch_file,
    load_severity_maps, read_table, split_by_patient,
};
use icu_labels::{AssembleError, LabelAssembler, PatientRecord};
use icu_model::{BatchReport, LabelOptions, PatientId, SeverityMaps, SkipReason};
use icu_output::{LabelAccumulator, label_file, label_frame, remove_existing, write_labels};

use crate::logging::redact_patient;

/// Input and output locations of one batch run.
#[derive(Debug, Clone)]
pub struct BatchPaths {
    pub imputed_dir: PathBuf,
    pub endpoint_dir: PathBuf,
    pub static_table: PathBuf,
    pub label_dir: PathBuf,
    pub severity_maps: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BatchRun {
    pub paths: BatchPaths,
    pub batch_idx: usize,
    pub format: TableFormat,
    pub dry_run: bool,
}

impl BatchRun {
    pub fn output_path(&self) -> PathBuf {
        label_file(&self.paths.label_dir, self.batch_idx, self.format)
    }
}

// ============================================================================
// Stage 1: Prepare
// ============================================================================

/// Remove the output of an earlier run so a failed run never leaves stale labels.
pub fn prepare_output(path: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        debug!(path = %path.display(), "dry run, previous output kept");
        return Ok(());
    }
    if remove_existing(path).with_context(|| format!("remove {}", path.display()))? {
        info!(path = %path.display(), "previous output removed");
    }
    Ok(())
}

// ============================================================================
// Stage 2: Load
// ============================================================================

/// Everything the label stage reads.
#[derive(Debug)]
pub struct BatchInputs {
    pub maps: SeverityMaps,
    pub statics: StaticTable,
    pub tables: BatchTables,
}

/// Batch tables, or only the imputed patients when the endpoint file is absent.
#[derive(Debug)]
pub enum BatchTables {
    Ready(PatientBatch),
    MissingEndpoints(Vec<PatientId>),
}

pub fn load_inputs(
    paths: &BatchPaths,
    batch_idx: usize,
    options: &LabelOptions,
) -> Result<BatchInputs> {
    let maps = match &paths.severity_maps {
        Some(path) => load_severity_maps(path)
            .with_context(|| format!("load severity maps {}", path.display()))?,
        None => {
            warn!("no severity maps given, phenotype labels will be unknown");
            SeverityMaps::default()
        }
    };
    let statics = StaticTable::load(&paths.static_table, options)
        .with_context(|| format!("load static table {}", paths.static_table.display()))?;

    let imputed_path = batch_file(&paths.imputed_dir, batch_idx);
    let imputed = read_table(&imputed_path)
        .with_context(|| format!("read imputed batch {}", imputed_path.display()))?;
    let endpoint_path = batch_file(&paths.endpoint_dir, batch_idx);
    let tables = match read_table(&endpoint_path) {
        Ok(endpoints) => BatchTables::Ready(
            PatientBatch::from_frames(&imputed, &endpoints, options)
                .context("partition batch tables")?,
        ),
        Err(IngestError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            warn!(path = %endpoint_path.display(), "endpoint batch missing");
            let schema = ImputedSchema::resolve(&imputed, options).context("imputed columns")?;
            let patients = split_by_patient(&imputed, &schema.patient_id)
                .context("partition imputed table")?
                .into_iter()
                .map(|(patient_id, _)| patient_id)
                .collect();
            BatchTables::MissingEndpoints(patients)
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("read endpoint batch {}", endpoint_path.display()));
        }
    };
    info!(
        static_patients = statics.len(),
        apache_ii_groups = maps.apache_ii.len(),
        apache_iv_groups = maps.apache_iv.len(),
        "inputs loaded"
    );
    Ok(BatchInputs {
        maps,
        statics,
        tables,
    })
}

// ============================================================================
// Stage 3: Label
// ============================================================================

/// Labels of one batch and the bookkeeping that goes with them.
#[derive(Debug)]
pub struct LabeledBatch {
    /// `None` when no patient could be labelled.
    pub frame: Option<DataFrame>,
    pub report: BatchReport,
}

/// Assemble labels for every patient of the batch.
///
/// Patients with unusable data are skipped and recorded in the report. A
/// contract violation between label arrays aborts the whole batch.
pub fn label_batch(
    inputs: &BatchInputs,
    options: &LabelOptions,
    batch_idx: usize,
) -> Result<LabeledBatch> {
    let mut report = BatchReport::new(batch_idx);
    let batch = match &inputs.tables {
        BatchTables::Ready(batch) => batch,
        BatchTables::MissingEndpoints(patients) => {
            report.patients_total = patients.len();
            for patient_id in patients {
                report.record_skip(*patient_id, SkipReason::MissingFile, "endpoint batch missing");
            }
            return Ok(LabeledBatch {
                frame: None,
                report,
            });
        }
    };

    let assembler = LabelAssembler::new(options, &inputs.maps);
    let mut accumulator = LabelAccumulator::new();
    let mut expected_rows = 0usize;
    report.patients_total = batch.len();

    for (done, (patient_id, slice)) in batch.patients().enumerate() {
        if options.progress_every > 0 && done > 0 && done % options.progress_every == 0 {
            info!(
                done,
                total = report.patients_total,
                skipped = report.skipped_count(),
                "labelling progress"
            );
        }
        let span = debug_span!("patient", patient_id = %redact_patient(patient_id));
        let _guard = span.enter();

        let imputed = match batch.imputed_series(slice) {
            Ok(series) => series,
            Err(error) => {
                skip(&mut report, patient_id, SkipReason::ReadError, error.to_string());
                continue;
            }
        };
        let endpoints = match batch.endpoint_series(patient_id) {
            Ok(series) => series,
            Err(error) => {
                skip(&mut report, patient_id, SkipReason::ReadError, error.to_string());
                continue;
            }
        };
        let record = PatientRecord {
            patient_id,
            imputed: &imputed,
            endpoints: &endpoints,
            static_record: inputs.statics.get(patient_id),
        };
        let labels = match assembler.assemble(&record) {
            Ok(Some(labels)) => labels,
            Ok(None) => {
                let detail = if endpoints.is_empty() {
                    "no endpoint rows"
                } else {
                    "no imputed rows"
                };
                skip(&mut report, patient_id, SkipReason::EmptySeries, detail.to_string());
                continue;
            }
            Err(error) if error.is_skippable() => {
                let reason = match &error {
                    AssembleError::Malformed(_) => SkipReason::ReadError,
                    _ => SkipReason::Alignment,
                };
                skip(&mut report, patient_id, reason, error.to_string());
                continue;
            }
            Err(error) => {
                return Err(anyhow!(error)).with_context(|| {
                    format!("label patient {} of batch {batch_idx}", redact_patient(patient_id))
                });
            }
        };

        let frame = label_frame(slice, batch.imputed_schema(), &labels, &options.columns)
            .context("build label frame")?;
        expected_rows += slice.height();
        accumulator.push(frame).context("append label frame")?;
        report.patients_labeled += 1;
        debug!(rows = slice.height(), "patient labelled");
    }

    if accumulator.rows() != expected_rows {
        bail!(
            "batch {batch_idx}: {} label rows for {expected_rows} imputed rows",
            accumulator.rows()
        );
    }
    Ok(LabeledBatch {
        frame: accumulator.finish(),
        report,
    })
}

fn skip(report: &mut BatchReport, patient_id: PatientId, reason: SkipReason, detail: String) {
    warn!(reason = %reason, detail = %detail, "patient skipped");
    report.record_skip(patient_id, reason, detail);
}

// ============================================================================
// Stage 4: Write
// ============================================================================

/// Persist the labels unless this is a dry run. Returns the written path.
pub fn write_output(
    frame: Option<DataFrame>,
    path: &Path,
    dry_run: bool,
) -> Result<Option<PathBuf>> {
    let Some(mut frame) = frame else {
        warn!("no patient labelled, nothing written");
        return Ok(None);
    };
    if dry_run {
        info!(rows = frame.height(), "dry run, labels not written");
        return Ok(None);
    }
    write_labels(&mut frame, path).with_context(|| format!("write {}", path.display()))?;
    Ok(Some(path.to_path_buf()))
}

/// Run all stages for one batch.
pub fn run_batch(run: &BatchRun, options: &LabelOptions) -> Result<BatchReport> {
    let span = info_span!("batch", batch_idx = run.batch_idx);
    let _guard = span.enter();
    let start = Instant::now();
    let output_path = run.output_path();

    prepare_output(&output_path, run.dry_run)?;
    let inputs = load_inputs(&run.paths, run.batch_idx, options)?;
    let LabeledBatch { frame, mut report } = label_batch(&inputs, options, run.batch_idx)?;
    let rows = frame.as_ref().map_or(0, DataFrame::height);
    report.output_path = write_output(frame, &output_path, run.dry_run)?;
    if report.output_path.is_some() {
        report.rows_written = rows;
    }

    info!(
        patients = report.patients_total,
        labelled = report.patients_labeled,
        skipped = report.skipped_count(),
        rows,
        duration_ms = start.elapsed().as_millis(),
        "batch complete"
    );
    Ok(report)
}
