//! Conversion of per-patient frame slices into typed series.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use icu_model::{EndpointSeries, FailureStatus, ImputedSeries};

use crate::columns::{EndpointSchema, ImputedSchema};
use crate::error::{IngestError, Result};

const MICROS_PER_DAY: i64 = 86_400_000_000;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Build the imputed series of one patient slice.
pub fn imputed_series(df: &DataFrame, schema: &ImputedSchema) -> Result<ImputedSeries> {
    Ok(ImputedSeries {
        timestamps: timestamps(df, &schema.abs_datetime)?,
        hr_cum_count: cumulative_counts(df, &schema.hr_cum_count)?,
        urine: floats(df, &schema.urine)?,
        urine_cum_count: cumulative_counts(df, &schema.urine_cum_count)?,
        weight: floats(df, &schema.weight)?,
    })
}

/// Build the endpoint series of one patient slice, in file order.
pub fn endpoint_series(df: &DataFrame, schema: &EndpointSchema) -> Result<EndpointSeries> {
    Ok(EndpointSeries {
        timestamps: timestamps(df, &schema.datetime)?,
        circ_failure: failure_states(df, &schema.circ_failure)?,
        resp_failure: failure_states(df, &schema.resp_failure)?,
    })
}

/// Timestamps as microsecond ticks.
///
/// Temporal columns are rescaled from their own unit, integer columns are
/// taken as ticks already, string columns are parsed as naive datetimes.
pub fn timestamps(df: &DataFrame, column: &str) -> Result<Vec<i64>> {
    let col = df.column(column)?;
    let dtype = col.dtype().clone();
    match dtype {
        DataType::Datetime(unit, _) => {
            let scale = |tick: i64| match unit {
                TimeUnit::Nanoseconds => tick / 1_000,
                TimeUnit::Microseconds => tick,
                TimeUnit::Milliseconds => tick * 1_000,
            };
            let ticks = col.cast(&DataType::Int64)?;
            required_ticks(column, ticks.i64()?, scale)
        }
        DataType::Date => {
            let days = col.cast(&DataType::Int64)?;
            required_ticks(column, days.i64()?, |day| day * MICROS_PER_DAY)
        }
        ref integer if integer.is_integer() => {
            let ticks = col.cast(&DataType::Int64)?;
            required_ticks(column, ticks.i64()?, |tick| tick)
        }
        DataType::String => col
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or_else(|| IngestError::NullValue {
                    column: column.to_string(),
                    row,
                })?;
                parse_timestamp(value).ok_or_else(|| IngestError::UnparsableTimestamp {
                    column: column.to_string(),
                    row,
                    value: value.to_string(),
                })
            })
            .collect(),
        other => Err(IngestError::UnsupportedType {
            column: column.to_string(),
            dtype: other.to_string(),
        }),
    }
}

fn required_ticks(
    column: &str,
    values: &Int64Chunked,
    scale: impl Fn(i64) -> i64,
) -> Result<Vec<i64>> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(&scale).ok_or_else(|| IngestError::NullValue {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

/// Parse a naive datetime (or bare date) into microsecond ticks.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|datetime| datetime.and_utc().timestamp_micros())
}

/// Cumulative measurement counts.
///
/// Gaps carry the previous count forward and a leading gap counts as zero,
/// so a missing cell never looks like a fresh measurement.
pub fn cumulative_counts(df: &DataFrame, column: &str) -> Result<Vec<u64>> {
    let values = numeric(df, column)?;
    let mut last = 0u64;
    Ok(values
        .f64()?
        .into_iter()
        .map(|value| {
            if let Some(count) = value.filter(|v| v.is_finite() && *v >= 0.0) {
                last = count as u64;
            }
            last
        })
        .collect())
}

/// Float values; nulls become NaN.
pub fn floats(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let values = numeric(df, column)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect())
}

/// Failure states from either categorical (`event_*`) or numeric codes.
pub fn failure_states(df: &DataFrame, column: &str) -> Result<Vec<FailureStatus>> {
    let col = df.column(column)?;
    if col.dtype() == &DataType::String {
        return Ok(col
            .str()?
            .into_iter()
            .map(FailureStatus::from_category)
            .collect());
    }
    let values = numeric(df, column)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(FailureStatus::from_code)
        .collect())
}

fn numeric(df: &DataFrame, column: &str) -> Result<Column> {
    let col = df.column(column)?;
    let dtype = col.dtype();
    if dtype.is_primitive_numeric() || dtype == &DataType::Boolean || dtype == &DataType::Null {
        return Ok(col.cast(&DataType::Float64)?);
    }
    Err(IngestError::UnsupportedType {
        column: column.to_string(),
        dtype: dtype.to_string(),
    })
}
