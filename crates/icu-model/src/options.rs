//! Configuration options for label derivation.
//!
//! Every field has a default matching the published benchmark, so an empty
//! TOML document deserializes to [`LabelOptions::default`].

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Names of the key columns shared by input and output tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnKeys {
    pub abs_datetime_key: String,
    pub rel_datetime_key: String,
    pub patient_id_key: String,
}

impl Default for ColumnKeys {
    fn default() -> Self {
        Self {
            abs_datetime_key: "datetime".to_string(),
            rel_datetime_key: "rel_datetime".to_string(),
            patient_id_key: "patientid".to_string(),
        }
    }
}

/// Names of the source columns the transforms read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceColumns {
    /// Cumulative heart-rate measurement count (reference vital for masking).
    pub hr_cum_count: String,
    pub urine: String,
    pub urine_cum_count: String,
    pub weight: String,
    /// Timestamp column of the endpoint table.
    pub endpoint_datetime: String,
    pub circ_failure_status: String,
    pub resp_failure_status: String,
    pub discharge_status: String,
    pub apache_ii_group: String,
    pub apache_iv_group: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            hr_cum_count: "vm1_IMPUTED_STATUS_CUM_COUNT".to_string(),
            urine: "vm24".to_string(),
            urine_cum_count: "vm24_IMPUTED_STATUS_CUM_COUNT".to_string(),
            weight: "vm131".to_string(),
            endpoint_datetime: "datetime".to_string(),
            circ_failure_status: "circ_failure_status".to_string(),
            resp_failure_status: "resp_failure_status".to_string(),
            discharge_status: "discharge_status".to_string(),
            apache_ii_group: "APACHE II Group".to_string(),
            apache_iv_group: "APACHE IV Group".to_string(),
        }
    }
}

/// Half-open look-ahead window `[lhours, rhours)` relative to a timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub lhours: u32,
    pub rhours: u32,
}

impl HourWindow {
    pub const fn new(lhours: u32, rhours: u32) -> Self {
        Self { lhours, rhours }
    }
}

/// How a timestep that is already in failure is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Positive iff any step of the window is in failure, `t` itself included
    /// when the window starts at zero.
    #[default]
    AnyFailure,
    /// Positive only for steps that are not yet in failure.
    OnsetOnly,
}

/// Horizons and windows for each label channel, in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelWindows {
    pub mortality_horizon_hours: u32,
    pub phenotype_horizon_hours: u32,
    pub circ_failure: HourWindow,
    pub resp_failure: HourWindow,
    pub urine_hours: u32,
    /// Trailing window in which the reference vital must have been measured.
    pub validity_lookback_hours: u32,
}

impl Default for ChannelWindows {
    fn default() -> Self {
        Self {
            mortality_horizon_hours: 24,
            phenotype_horizon_hours: 24,
            circ_failure: HourWindow::new(0, 12),
            resp_failure: HourWindow::new(0, 12),
            urine_hours: 2,
            validity_lookback_hours: 2,
        }
    }
}

/// Options controlling label derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    /// Time-grid resolution.
    pub steps_per_hour: u32,
    pub columns: ColumnKeys,
    pub sources: SourceColumns,
    pub windows: ChannelWindows,
    /// Oliguria cutoff in mL/kg/h; rates strictly below it are positive.
    pub oliguria_threshold: f64,
    pub window_policy: WindowPolicy,
    /// Log progress every this many patients (0 disables).
    pub progress_every: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            steps_per_hour: 12,
            columns: ColumnKeys::default(),
            sources: SourceColumns::default(),
            windows: ChannelWindows::default(),
            oliguria_threshold: 0.5,
            window_policy: WindowPolicy::default(),
            progress_every: 100,
        }
    }
}

impl LabelOptions {
    pub fn with_window_policy(mut self, policy: WindowPolicy) -> Self {
        self.window_policy = policy;
        self
    }

    /// Convert a duration in hours into a number of grid steps.
    pub fn steps(&self, hours: u32) -> usize {
        hours as usize * self.steps_per_hour as usize
    }

    /// Reject option sets the transforms cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.steps_per_hour == 0 {
            return Err(ModelError::InvalidOptions(
                "steps_per_hour must be positive".to_string(),
            ));
        }
        for (name, window) in [
            ("circ_failure", self.windows.circ_failure),
            ("resp_failure", self.windows.resp_failure),
        ] {
            if window.lhours >= window.rhours {
                return Err(ModelError::InvalidOptions(format!(
                    "{name} window [{}, {}) is empty",
                    window.lhours, window.rhours
                )));
            }
        }
        if self.windows.urine_hours == 0 {
            return Err(ModelError::InvalidOptions(
                "urine_hours must be positive".to_string(),
            ));
        }
        if self.windows.validity_lookback_hours == 0 {
            return Err(ModelError::InvalidOptions(
                "validity_lookback_hours must be positive".to_string(),
            ));
        }
        if !self.oliguria_threshold.is_finite() {
            return Err(ModelError::InvalidOptions(
                "oliguria_threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_benchmark() {
        let options = LabelOptions::default();
        assert_eq!(options.steps_per_hour, 12);
        assert_eq!(options.steps(options.windows.mortality_horizon_hours), 288);
        assert_eq!(options.windows.circ_failure, HourWindow::new(0, 12));
        assert_eq!(options.windows.urine_hours, 2);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rejects_empty_window() {
        let mut options = LabelOptions::default();
        options.windows.resp_failure = HourWindow::new(3, 3);
        assert!(options.validate().is_err());
    }

    #[test]
    fn rejects_zero_resolution() {
        let mut options = LabelOptions::default();
        options.steps_per_hour = 0;
        assert!(options.validate().is_err());
    }
}
