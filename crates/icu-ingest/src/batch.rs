//! Per-patient partitioning of batch tables.

use std::collections::HashMap;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use icu_model::{EndpointSeries, ImputedSeries, LabelOptions, PatientId};

use crate::cells::cell_i64;
use crate::columns::{EndpointSchema, ImputedSchema};
use crate::convert::{endpoint_series, imputed_series};
use crate::error::{IngestError, Result};
use crate::tables::{batch_file, read_table};

/// Split a frame into one slice per patient, in order of first appearance.
pub fn split_by_patient(df: &DataFrame, id_column: &str) -> Result<Vec<(PatientId, DataFrame)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    df.partition_by_stable([id_column], true)?
        .into_iter()
        .map(|part| {
            let id = cell_i64(&part.column(id_column)?.get(0)?)
                .value()
                .ok_or_else(|| IngestError::NullValue {
                    column: id_column.to_string(),
                    row: 0,
                })?;
            Ok((PatientId::new(id), part))
        })
        .collect()
}

/// Imputed and endpoint tables of one batch, sliced per patient.
#[derive(Debug, Clone)]
pub struct PatientBatch {
    imputed_schema: ImputedSchema,
    endpoint_schema: EndpointSchema,
    imputed: Vec<(PatientId, DataFrame)>,
    endpoints: HashMap<PatientId, DataFrame>,
}

impl PatientBatch {
    pub fn load(
        imputed_dir: &Path,
        endpoint_dir: &Path,
        batch_idx: usize,
        options: &LabelOptions,
    ) -> Result<Self> {
        let imputed = read_table(&batch_file(imputed_dir, batch_idx))?;
        let endpoints = read_table(&batch_file(endpoint_dir, batch_idx))?;
        Self::from_frames(&imputed, &endpoints, options)
    }

    pub fn from_frames(
        imputed: &DataFrame,
        endpoints: &DataFrame,
        options: &LabelOptions,
    ) -> Result<Self> {
        let imputed_schema = ImputedSchema::resolve(imputed, options)?;
        let endpoint_schema = EndpointSchema::resolve(endpoints, options)?;
        let imputed = split_by_patient(imputed, &imputed_schema.patient_id)?;
        let endpoints: HashMap<_, _> = split_by_patient(endpoints, &endpoint_schema.patient_id)?
            .into_iter()
            .collect();
        debug!(
            imputed_patients = imputed.len(),
            endpoint_patients = endpoints.len(),
            "batch partitioned"
        );
        Ok(Self {
            imputed_schema,
            endpoint_schema,
            imputed,
            endpoints,
        })
    }

    pub fn imputed_schema(&self) -> &ImputedSchema {
        &self.imputed_schema
    }

    /// Patients of the imputed table with their slices.
    pub fn patients(&self) -> impl Iterator<Item = (PatientId, &DataFrame)> {
        self.imputed.iter().map(|(id, df)| (*id, df))
    }

    pub fn len(&self) -> usize {
        self.imputed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imputed.is_empty()
    }

    pub fn imputed_series(&self, slice: &DataFrame) -> Result<ImputedSeries> {
        imputed_series(slice, &self.imputed_schema)
    }

    /// Endpoint series of a patient; empty when the endpoint table has no rows for it.
    pub fn endpoint_series(&self, patient_id: PatientId) -> Result<EndpointSeries> {
        match self.endpoints.get(&patient_id) {
            Some(slice) => endpoint_series(slice, &self.endpoint_schema),
            None => Ok(EndpointSeries::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imputed() -> DataFrame {
        df! {
            "datetime" => [0i64, 300, 0, 300, 600],
            "rel_datetime" => [0i64, 300, 0, 300, 600],
            "patientid" => [20i64, 20, 10, 10, 10],
            "vm1_IMPUTED_STATUS_CUM_COUNT" => [1i64, 2, 1, 2, 3],
            "vm24" => [0.0f64, 0.0, 10.0, 10.0, 10.0],
            "vm24_IMPUTED_STATUS_CUM_COUNT" => [0i64, 0, 1, 2, 3],
            "vm131" => [70.0f64, 70.0, 80.0, 80.0, 80.0],
        }
        .unwrap()
    }

    fn endpoints() -> DataFrame {
        df! {
            "datetime" => [300i64, 0, 600],
            "patientid" => [10i64, 10, 10],
            "circ_failure_status" => [0.0f64, 0.0, 1.0],
            "resp_failure_status" => ["event_0", "event_0", "event_1"],
        }
        .unwrap()
    }

    #[test]
    fn split_keeps_first_appearance_order() {
        let parts = split_by_patient(&imputed(), "patientid").unwrap();
        let ids: Vec<_> = parts.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(ids, vec![20, 10]);
        assert_eq!(parts[0].1.height(), 2);
        assert_eq!(parts[1].1.height(), 3);
    }

    #[test]
    fn split_of_empty_frame_is_empty() {
        let df = imputed().head(Some(0));
        assert!(split_by_patient(&df, "patientid").unwrap().is_empty());
    }

    #[test]
    fn batch_slices_and_converts() {
        let batch =
            PatientBatch::from_frames(&imputed(), &endpoints(), &LabelOptions::default()).unwrap();
        assert_eq!(batch.len(), 2);

        let (id, slice) = batch.patients().nth(1).unwrap();
        assert_eq!(id, PatientId::new(10));
        let series = batch.imputed_series(slice).unwrap();
        assert_eq!(series.timestamps, vec![0, 300, 600]);
        assert_eq!(series.urine_cum_count, vec![1, 2, 3]);

        // endpoint rows stay in file order; the assembler sorts them
        let endpoints = batch.endpoint_series(id).unwrap();
        assert_eq!(endpoints.timestamps, vec![300, 0, 600]);
        assert!(endpoints.circ_failure[2].is_failure());
        assert!(endpoints.resp_failure[2].is_failure());

        let missing = batch.endpoint_series(PatientId::new(20)).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn missing_source_column_is_reported() {
        let imputed = imputed().drop("vm131").unwrap();
        let err = PatientBatch::from_frames(&imputed, &endpoints(), &LabelOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { table: "imputed", .. }));
    }
}
