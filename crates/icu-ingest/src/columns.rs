//! Case-insensitive resolution of configured column names against a frame.

use std::collections::HashMap;

use polars::prelude::DataFrame;

use icu_model::LabelOptions;

use crate::error::{IngestError, Result};

/// Upper-cased column name to the name actually present in the frame.
#[derive(Debug, Clone)]
pub struct ColumnLookup {
    table: &'static str,
    map: HashMap<String, String>,
}

impl ColumnLookup {
    pub fn new<I, S>(table: &'static str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            // first spelling wins when a frame repeats a name in another case
            map.entry(name.to_ascii_uppercase())
                .or_insert_with(|| name.to_string());
        }
        Self { table, map }
    }

    pub fn from_frame(table: &'static str, df: &DataFrame) -> Self {
        Self::new(table, df.get_column_names().iter().map(|name| name.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn require(&self, name: &str) -> Result<String> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| IngestError::MissingColumn {
                table: self.table,
                column: name.to_string(),
            })
    }
}

/// Resolved column names of an imputed batch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImputedSchema {
    pub patient_id: String,
    pub abs_datetime: String,
    pub rel_datetime: String,
    pub hr_cum_count: String,
    pub urine: String,
    pub urine_cum_count: String,
    pub weight: String,
}

impl ImputedSchema {
    pub fn resolve(df: &DataFrame, options: &LabelOptions) -> Result<Self> {
        let lookup = ColumnLookup::from_frame("imputed", df);
        Ok(Self {
            patient_id: lookup.require(&options.columns.patient_id_key)?,
            abs_datetime: lookup.require(&options.columns.abs_datetime_key)?,
            rel_datetime: lookup.require(&options.columns.rel_datetime_key)?,
            hr_cum_count: lookup.require(&options.sources.hr_cum_count)?,
            urine: lookup.require(&options.sources.urine)?,
            urine_cum_count: lookup.require(&options.sources.urine_cum_count)?,
            weight: lookup.require(&options.sources.weight)?,
        })
    }
}

/// Resolved column names of an endpoint batch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSchema {
    pub patient_id: String,
    pub datetime: String,
    pub circ_failure: String,
    pub resp_failure: String,
}

impl EndpointSchema {
    pub fn resolve(df: &DataFrame, options: &LabelOptions) -> Result<Self> {
        let lookup = ColumnLookup::from_frame("endpoint", df);
        Ok(Self {
            patient_id: lookup.require(&options.columns.patient_id_key)?,
            datetime: lookup.require(&options.sources.endpoint_datetime)?,
            circ_failure: lookup.require(&options.sources.circ_failure_status)?,
            resp_failure: lookup.require(&options.sources.resp_failure_status)?,
        })
    }
}

/// Resolved column names of the static table.
///
/// Only the patient identifier is mandatory; a table without severity
/// columns simply yields no phenotype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSchema {
    pub patient_id: String,
    pub discharge: Option<String>,
    pub apache_ii: Option<String>,
    pub apache_iv: Option<String>,
}

impl StaticSchema {
    pub fn resolve(df: &DataFrame, options: &LabelOptions) -> Result<Self> {
        let lookup = ColumnLookup::from_frame("static", df);
        let optional = |name: &str| lookup.get(name).map(str::to_string);
        Ok(Self {
            patient_id: lookup.require(&options.columns.patient_id_key)?,
            discharge: optional(&options.sources.discharge_status),
            apache_ii: optional(&options.sources.apache_ii_group),
            apache_iv: optional(&options.sources.apache_iv_group),
        })
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let lookup = ColumnLookup::new("imputed", ["PatientID", "vm24"]);
        assert_eq!(lookup.get("patientid"), Some("PatientID"));
        assert_eq!(lookup.get("VM24"), Some("vm24"));
        assert!(lookup.get("vm131").is_none());
    }

    #[test]
    fn require_reports_table_and_column() {
        let lookup = ColumnLookup::new("endpoint", ["datetime"]);
        let err = lookup.require("circ_failure_status").unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn { table: "endpoint", ref column }
                if column == "circ_failure_status"
        ));
    }

    #[test]
    fn static_schema_tolerates_missing_severity_columns() {
        let df = df! {
            "PATIENTID" => [1i64, 2],
            "discharge_status" => ["alive", "dead"],
        }
        .unwrap();
        let schema = StaticSchema::resolve(&df, &LabelOptions::default()).unwrap();
        assert_eq!(schema.patient_id, "PATIENTID");
        assert_eq!(schema.discharge.as_deref(), Some("discharge_status"));
        assert!(schema.apache_ii.is_none());
        assert!(schema.apache_iv.is_none());
    }
}
