//! Per-patient time series on the fixed time grid.

use serde::{Deserialize, Serialize};

/// Organ-failure state at one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FailureStatus {
    #[default]
    NotFailure,
    Failure,
    Unknown,
}

impl FailureStatus {
    /// Numeric endpoint codes: zero is stable, any positive code is failure.
    pub fn from_code(code: Option<f64>) -> Self {
        match code {
            Some(value) if value.is_nan() => Self::Unknown,
            Some(value) if value > 0.0 => Self::Failure,
            Some(_) => Self::NotFailure,
            None => Self::Unknown,
        }
    }

    /// Categorical endpoint states (`event_0` .. `event_3`, `UNKNOWN`).
    ///
    /// Any of the three event grades counts as failure.
    pub fn from_category(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Unknown;
        };
        let value = value.trim();
        if value.eq_ignore_ascii_case("unknown") {
            return Self::Unknown;
        }
        match value.to_ascii_lowercase().as_str() {
            "event_1" | "event_2" | "event_3" => Self::Failure,
            _ => Self::NotFailure,
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failure)
    }
}

/// Imputed clinical variables for one admission.
///
/// All vectors share the same length, one entry per grid step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputedSeries {
    /// Absolute timestamps as integer ticks (for alignment only).
    pub timestamps: Vec<i64>,
    /// Cumulative count of genuine heart-rate measurements.
    pub hr_cum_count: Vec<u64>,
    /// Urine volume recorded at each step.
    pub urine: Vec<f64>,
    pub urine_cum_count: Vec<u64>,
    /// Body weight in kg; NaN where unavailable.
    pub weight: Vec<f64>,
}

impl ImputedSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// True when every column has one entry per timestamp.
    pub fn is_consistent(&self) -> bool {
        let n = self.timestamps.len();
        self.hr_cum_count.len() == n
            && self.urine.len() == n
            && self.urine_cum_count.len() == n
            && self.weight.len() == n
    }
}

/// Derived organ-failure endpoints for one admission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointSeries {
    pub timestamps: Vec<i64>,
    pub circ_failure: Vec<FailureStatus>,
    pub resp_failure: Vec<FailureStatus>,
}

impl EndpointSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.timestamps.len();
        self.circ_failure.len() == n && self.resp_failure.len() == n
    }

    pub fn is_sorted(&self) -> bool {
        self.timestamps.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Stable sort of all columns by timestamp. No-op when already sorted or
    /// when the columns are inconsistent.
    pub fn sort_by_time(&mut self) {
        if self.is_sorted() || !self.is_consistent() {
            return;
        }
        let mut order: Vec<usize> = (0..self.timestamps.len()).collect();
        order.sort_by_key(|&idx| self.timestamps[idx]);
        self.timestamps = order.iter().map(|&idx| self.timestamps[idx]).collect();
        self.circ_failure = order.iter().map(|&idx| self.circ_failure[idx]).collect();
        self.resp_failure = order.iter().map(|&idx| self.resp_failure[idx]).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_status_mapping() {
        assert_eq!(
            FailureStatus::from_category(Some("event_0")),
            FailureStatus::NotFailure
        );
        assert_eq!(
            FailureStatus::from_category(Some("event_2")),
            FailureStatus::Failure
        );
        assert_eq!(
            FailureStatus::from_category(Some("UNKNOWN")),
            FailureStatus::Unknown
        );
        assert_eq!(FailureStatus::from_category(None), FailureStatus::Unknown);
    }

    #[test]
    fn numeric_status_mapping() {
        assert_eq!(FailureStatus::from_code(Some(0.0)), FailureStatus::NotFailure);
        assert_eq!(FailureStatus::from_code(Some(1.0)), FailureStatus::Failure);
        assert_eq!(FailureStatus::from_code(Some(f64::NAN)), FailureStatus::Unknown);
    }

    #[test]
    fn sort_is_stable() {
        let mut endpoints = EndpointSeries {
            timestamps: vec![3, 1, 1, 2],
            circ_failure: vec![
                FailureStatus::Failure,
                FailureStatus::NotFailure,
                FailureStatus::Unknown,
                FailureStatus::NotFailure,
            ],
            resp_failure: vec![FailureStatus::NotFailure; 4],
        };
        endpoints.sort_by_time();
        assert_eq!(endpoints.timestamps, vec![1, 1, 2, 3]);
        assert_eq!(endpoints.circ_failure[0], FailureStatus::NotFailure);
        assert_eq!(endpoints.circ_failure[1], FailureStatus::Unknown);
        assert_eq!(endpoints.circ_failure[3], FailureStatus::Failure);
    }
}
