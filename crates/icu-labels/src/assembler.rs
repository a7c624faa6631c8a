//! Per-patient label assembly.
//!
//! The assembler checks that the imputed and endpoint series describe the
//! same time grid, derives every channel and masks each of them with the
//! heart-rate validity mask. Misaligned or empty inputs are reported back to
//! the caller so it can skip the patient; contract violations between label
//! arrays surface as [`AssembleError::Contract`] and are not meant to be
//! skipped.

use std::borrow::Cow;

use thiserror::Error;
use tracing::{debug, trace};

use icu_model::{
    EndpointSeries, ImputedSeries, Label, LabelError, LabelOptions, PatientId,
    PatientLabels, SeverityMaps, StaticRecord,
};

use crate::horizon::horizon_gated;
use crate::los::remaining_length_of_stay;
use crate::mask::apply_validity_mask;
use crate::severity::merge_severity_groups;
use crate::transition::{StepWindow, transition_to_failure};
use crate::urine::{UrineWindow, future_urine_output};
use crate::validity::measurement_validity;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssembleError {
    #[error("imputed series has {imputed} rows but endpoint series has {endpoints}")]
    LengthDiffers { imputed: usize, endpoints: usize },
    #[error("timestamps diverge at row {row}: imputed {imputed}, endpoint {endpoint}")]
    TimestampMismatch {
        row: usize,
        imputed: i64,
        endpoint: i64,
    },
    #[error("malformed series: {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Contract(#[from] LabelError),
}

impl AssembleError {
    /// Whether the batch may continue after skipping this patient.
    pub fn is_skippable(&self) -> bool {
        !matches!(self, Self::Contract(_))
    }
}

/// Inputs for one admission.
#[derive(Debug, Clone, Copy)]
pub struct PatientRecord<'a> {
    pub patient_id: PatientId,
    pub imputed: &'a ImputedSeries,
    pub endpoints: &'a EndpointSeries,
    pub static_record: Option<&'a StaticRecord>,
}

/// Derives label channels for patients under one set of options.
#[derive(Debug, Clone, Copy)]
pub struct LabelAssembler<'a> {
    options: &'a LabelOptions,
    maps: &'a SeverityMaps,
}

impl<'a> LabelAssembler<'a> {
    pub fn new(options: &'a LabelOptions, maps: &'a SeverityMaps) -> Self {
        Self { options, maps }
    }

    /// Compute all channels for one patient.
    ///
    /// Returns `Ok(None)` when either series is empty: there is nothing to
    /// label, which is different from a table of unknowns.
    pub fn assemble(
        &self,
        patient: &PatientRecord<'_>,
    ) -> Result<Option<PatientLabels>, AssembleError> {
        let imputed = patient.imputed;
        if imputed.is_empty() || patient.endpoints.is_empty() {
            return Ok(None);
        }
        if !imputed.is_consistent() {
            return Err(AssembleError::Malformed("imputed columns differ in length"));
        }
        if !patient.endpoints.is_consistent() {
            return Err(AssembleError::Malformed("endpoint columns differ in length"));
        }
        let endpoints = sorted_endpoints(patient.endpoints);
        check_alignment(imputed, &endpoints)?;

        let options = self.options;
        let windows = &options.windows;
        let stay_len = imputed.len();
        let hr_valid = measurement_validity(
            &imputed.hr_cum_count,
            options.steps(windows.validity_lookback_hours),
        );
        trace!(
            valid_steps = hr_valid.iter().filter(|v| **v).count(),
            stay_len,
            "heart-rate validity"
        );

        let mortality_value = patient
            .static_record
            .map(|record| if record.discharge.is_dead() { 1.0 } else { 0.0 });
        let mortality = horizon_gated(
            stay_len,
            mortality_value,
            options.steps(windows.mortality_horizon_hours),
        );

        let circ_failure = transition_to_failure(
            &endpoints.circ_failure,
            StepWindow::from_hours(
                windows.circ_failure.lhours,
                windows.circ_failure.rhours,
                options.steps_per_hour,
            ),
            options.window_policy,
        );
        let resp_failure = transition_to_failure(
            &endpoints.resp_failure,
            StepWindow::from_hours(
                windows.resp_failure.lhours,
                windows.resp_failure.rhours,
                options.steps_per_hour,
            ),
            options.window_policy,
        );

        let urine = future_urine_output(
            &imputed.urine,
            &imputed.urine_cum_count,
            &imputed.weight,
            UrineWindow {
                steps: options.steps(windows.urine_hours),
                hours: f64::from(windows.urine_hours),
                threshold: options.oliguria_threshold,
            },
        );

        let phenotype_value = patient.static_record.and_then(|record| {
            merge_severity_groups(
                record.apache_ii_group,
                record.apache_iv_group,
                &self.maps.apache_ii,
                &self.maps.apache_iv,
            )
        });
        if phenotype_value.is_none() {
            debug!(
                apache_ii = ?patient.static_record.and_then(|r| r.apache_ii_group),
                apache_iv = ?patient.static_record.and_then(|r| r.apache_iv_group),
                "no phenotype bucket"
            );
        }
        let phenotype = horizon_gated(
            stay_len,
            phenotype_value.map(|bucket| bucket.as_label()),
            options.steps(windows.phenotype_horizon_hours),
        );

        let remaining_los = remaining_length_of_stay(stay_len, options.steps_per_hour);

        let masked = |labels: &[Label]| apply_validity_mask(labels, &hr_valid);
        Ok(Some(PatientLabels {
            patient_id: patient.patient_id,
            mortality: masked(&mortality)?,
            circ_failure: masked(&circ_failure)?,
            resp_failure: masked(&resp_failure)?,
            urine_rate: masked(&urine.rate)?,
            urine_binary: masked(&urine.oliguria)?,
            phenotype: masked(&phenotype)?,
            remaining_los: masked(&remaining_los)?,
        }))
    }
}

/// Convenience wrapper around [`LabelAssembler::assemble`].
pub fn assemble_patient_labels(
    patient: &PatientRecord<'_>,
    options: &LabelOptions,
    maps: &SeverityMaps,
) -> Result<Option<PatientLabels>, AssembleError> {
    LabelAssembler::new(options, maps).assemble(patient)
}

fn sorted_endpoints(endpoints: &EndpointSeries) -> Cow<'_, EndpointSeries> {
    if endpoints.is_sorted() {
        Cow::Borrowed(endpoints)
    } else {
        let mut owned = endpoints.clone();
        owned.sort_by_time();
        Cow::Owned(owned)
    }
}

fn check_alignment(
    imputed: &ImputedSeries,
    endpoints: &EndpointSeries,
) -> Result<(), AssembleError> {
    if imputed.len() != endpoints.len() {
        return Err(AssembleError::LengthDiffers {
            imputed: imputed.len(),
            endpoints: endpoints.len(),
        });
    }
    let mismatch = imputed
        .timestamps
        .iter()
        .zip(&endpoints.timestamps)
        .position(|(a, b)| a != b);
    match mismatch {
        Some(row) => Err(AssembleError::TimestampMismatch {
            row,
            imputed: imputed.timestamps[row],
            endpoint: endpoints.timestamps[row],
        }),
        None => Ok(()),
    }
}

