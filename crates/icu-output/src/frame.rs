//! Row-aligned label frames and their accumulation over a batch.

use polars::prelude::*;

use icu_ingest::ImputedSchema;
use icu_model::{ColumnKeys, LabelChannel, PatientLabels};

use crate::error::{OutputError, Result};

/// Column names of a label frame, in order.
pub fn label_columns(keys: &ColumnKeys) -> Vec<String> {
    let mut names = vec![
        keys.abs_datetime_key.clone(),
        keys.rel_datetime_key.clone(),
        keys.patient_id_key.clone(),
    ];
    names.extend(
        LabelChannel::ALL
            .iter()
            .map(|channel| channel.column_name().to_string()),
    );
    names
}

/// One patient's labels next to the time and id columns of its imputed slice.
///
/// Unknown labels become null cells.
pub fn label_frame(
    slice: &DataFrame,
    schema: &ImputedSchema,
    labels: &PatientLabels,
    keys: &ColumnKeys,
) -> Result<DataFrame> {
    if labels.stay_len() != slice.height() {
        return Err(OutputError::RowCount {
            patient_id: labels.patient_id,
            labels: labels.stay_len(),
            rows: slice.height(),
        });
    }
    let key_column = |source: &str, target: &str| -> Result<Column> {
        Ok(slice.column(source)?.clone().with_name(target.into()))
    };
    let mut columns = vec![
        key_column(&schema.abs_datetime, &keys.abs_datetime_key)?,
        key_column(&schema.rel_datetime, &keys.rel_datetime_key)?,
        key_column(&schema.patient_id, &keys.patient_id_key)?,
    ];
    for (channel, values) in labels.channels() {
        columns.push(Column::new(channel.column_name().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Per-patient label frames of one batch, stacked in arrival order.
#[derive(Debug, Default)]
pub struct LabelAccumulator {
    combined: Option<DataFrame>,
    patients: usize,
}

impl LabelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: DataFrame) -> Result<()> {
        match self.combined.as_mut() {
            Some(combined) => {
                combined.vstack_mut(&frame)?;
            }
            None => self.combined = Some(frame),
        }
        self.patients += 1;
        Ok(())
    }

    pub fn patients(&self) -> usize {
        self.patients
    }

    pub fn rows(&self) -> usize {
        self.combined.as_ref().map_or(0, DataFrame::height)
    }

    /// The combined frame, or `None` when no patient was labelled.
    pub fn finish(self) -> Option<DataFrame> {
        self.combined.map(|mut df| {
            df.as_single_chunk_par();
            df
        })
    }
}

#[cfg(test)]
mod tests {
    use icu_model::{LabelOptions, PatientId};

    use super::*;

    fn schema() -> ImputedSchema {
        ImputedSchema {
            patient_id: "PatientID".to_string(),
            abs_datetime: "Datetime".to_string(),
            rel_datetime: "rel_datetime".to_string(),
            hr_cum_count: "vm1_IMPUTED_STATUS_CUM_COUNT".to_string(),
            urine: "vm24".to_string(),
            urine_cum_count: "vm24_IMPUTED_STATUS_CUM_COUNT".to_string(),
            weight: "vm131".to_string(),
        }
    }

    fn slice(patient: i64, len: usize) -> DataFrame {
        let ticks: Vec<i64> = (0..len as i64).map(|t| t * 300).collect();
        df! {
            "Datetime" => ticks.clone(),
            "rel_datetime" => ticks,
            "PatientID" => vec![patient; len],
        }
        .unwrap()
    }

    fn labels(patient: i64, len: usize) -> PatientLabels {
        let mut mortality = vec![None; len];
        mortality[len - 1] = Some(1.0);
        PatientLabels {
            patient_id: PatientId::new(patient),
            mortality,
            circ_failure: vec![Some(0.0); len],
            resp_failure: vec![Some(1.0); len],
            urine_rate: vec![Some(0.8); len],
            urine_binary: vec![Some(0.0); len],
            phenotype: vec![None; len],
            remaining_los: vec![Some(1.0); len],
        }
    }

    #[test]
    fn frame_has_key_and_label_columns() {
        let keys = LabelOptions::default().columns;
        let frame = label_frame(&slice(3, 4), &schema(), &labels(3, 4), &keys).unwrap();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, label_columns(&keys));
        assert_eq!(frame.height(), 4);

        let mortality = frame.column("Mortality_At24Hours").unwrap().f64().unwrap();
        assert_eq!(mortality.null_count(), 3);
        assert_eq!(mortality.get(3), Some(1.0));
        let phenotype = frame.column("Phenotyping_APACHEGroup").unwrap();
        assert_eq!(phenotype.dtype(), &DataType::Float64);
        assert_eq!(phenotype.null_count(), 4);
    }

    #[test]
    fn row_count_must_match() {
        let keys = LabelOptions::default().columns;
        let err = label_frame(&slice(3, 5), &schema(), &labels(3, 4), &keys).unwrap_err();
        assert!(matches!(
            err,
            OutputError::RowCount {
                labels: 4,
                rows: 5,
                ..
            }
        ));
    }

    #[test]
    fn accumulator_stacks_in_order() {
        let keys = LabelOptions::default().columns;
        let mut acc = LabelAccumulator::new();
        assert_eq!(acc.rows(), 0);
        for (patient, len) in [(1, 3), (2, 5)] {
            let frame = label_frame(&slice(patient, len), &schema(), &labels(patient, len), &keys)
                .unwrap();
            acc.push(frame).unwrap();
        }
        assert_eq!(acc.patients(), 2);
        assert_eq!(acc.rows(), 8);
        let combined = acc.finish().unwrap();
        let ids = combined.column("patientid").unwrap().i64().unwrap();
        assert_eq!(ids.get(0), Some(1));
        assert_eq!(ids.get(7), Some(2));
    }

    #[test]
    fn empty_accumulator_has_no_frame() {
        assert!(LabelAccumulator::new().finish().is_none());
    }
}
