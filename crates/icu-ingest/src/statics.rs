//! Static per-admission attributes keyed by patient.

use std::collections::HashMap;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, warn};

use icu_model::{DischargeStatus, LabelOptions, PatientId, StaticRecord};

use crate::cells::{Cell, cell_f64, cell_i64, cell_text};
use crate::columns::StaticSchema;
use crate::error::{IngestError, Result};
use crate::tables::read_table;

/// Static records of every patient in the cohort.
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    records: HashMap<PatientId, StaticRecord>,
}

impl StaticTable {
    pub fn load(path: &Path, options: &LabelOptions) -> Result<Self> {
        let df = read_table(path)?;
        Self::from_frame(&df, options)
    }

    /// Rows without a usable patient id are dropped; a repeated id keeps
    /// its first row.
    pub fn from_frame(df: &DataFrame, options: &LabelOptions) -> Result<Self> {
        let schema = StaticSchema::resolve(df, options)?;
        let ids = df.column(&schema.patient_id)?;
        let discharge = optional_column(df, schema.discharge.as_deref())?;
        let apache_ii = optional_column(df, schema.apache_ii.as_deref())?;
        let apache_iv = optional_column(df, schema.apache_iv.as_deref())?;

        let mut records = HashMap::with_capacity(df.height());
        let mut duplicates = 0usize;
        for row in 0..df.height() {
            let Some(raw_id) = cell_i64(&ids.get(row)?).value() else {
                warn!(row, "static row without patient id ignored");
                continue;
            };
            let patient_id = PatientId::new(raw_id);
            if records.contains_key(&patient_id) {
                duplicates += 1;
                continue;
            }
            let record = StaticRecord {
                discharge: discharge_at(discharge, row)?,
                apache_ii_group: group_at(apache_ii, row)?,
                apache_iv_group: group_at(apache_iv, row)?,
            };
            records.insert(patient_id, record);
        }
        if duplicates > 0 {
            warn!(duplicates, "duplicate static rows ignored");
        }
        debug!(patients = records.len(), "static table loaded");
        Ok(Self { records })
    }

    pub fn get(&self, patient_id: PatientId) -> Option<&StaticRecord> {
        self.records.get(&patient_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(PatientId, StaticRecord)> for StaticTable {
    fn from_iter<I: IntoIterator<Item = (PatientId, StaticRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

fn optional_column<'a>(df: &'a DataFrame, name: Option<&str>) -> Result<Option<&'a Column>> {
    name.map(|name| df.column(name).map_err(IngestError::from))
        .transpose()
}

fn discharge_at(column: Option<&Column>, row: usize) -> Result<DischargeStatus> {
    let Some(column) = column else {
        return Ok(DischargeStatus::Unknown);
    };
    Ok(match cell_text(&column.get(row)?) {
        Cell::Value(text) => DischargeStatus::parse(&text),
        Cell::Missing => DischargeStatus::Unknown,
        Cell::Invalid(raw) => {
            warn!(
                row,
                column = %column.name(),
                value = %raw,
                "unreadable discharge status, treated as not dead"
            );
            DischargeStatus::Unknown
        }
    })
}

fn group_at(column: Option<&Column>, row: usize) -> Result<Option<f64>> {
    let Some(column) = column else {
        return Ok(None);
    };
    Ok(match cell_f64(&column.get(row)?) {
        Cell::Value(score) => Some(score),
        Cell::Missing => None,
        Cell::Invalid(raw) => {
            warn!(row, column = %column.name(), value = %raw, "unreadable severity group");
            None
        }
    })
}
