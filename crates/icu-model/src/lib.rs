//! Shared data model for ICU benchmark label derivation.

pub mod error;
pub mod ids;
pub mod labels;
pub mod options;
pub mod processing;
pub mod series;
pub mod statics;

pub use error::{LabelError, ModelError, Result};
pub use ids::PatientId;
pub use labels::{Label, LabelChannel, PatientLabels};
pub use options::{
    ChannelWindows, ColumnKeys, HourWindow, LabelOptions, SourceColumns, WindowPolicy,
};
pub use processing::{BatchReport, SkipReason, SkippedPatient};
pub use series::{EndpointSeries, FailureStatus, ImputedSeries};
pub use statics::{
    DischargeStatus, PhenotypeBucket, SeverityGroupMap, SeverityMaps, StaticRecord,
};
