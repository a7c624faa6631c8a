//! Loading of the per-batch input tables and slicing them into per-patient series.
//!
//! The imputed and endpoint tables of a batch are read whole (parquet or CSV),
//! their configured columns are resolved case-insensitively once, and each
//! patient's slice is converted into the plain series the label transforms use.

pub mod batch;
pub mod cells;
pub mod columns;
pub mod config;
pub mod convert;
pub mod error;
pub mod statics;
pub mod tables;

pub use batch::{PatientBatch, split_by_patient};
pub use cells::{Cell, cell_f64, cell_i64, cell_text, parse_f64, parse_i64};
pub use columns::{ColumnLookup, EndpointSchema, ImputedSchema, StaticSchema};
pub use config::{load_label_options, load_severity_maps, parse_severity_maps};
pub use convert::{
    cumulative_counts, endpoint_series, failure_states, floats, imputed_series, parse_timestamp,
    timestamps,
};
pub use error::{IngestError, Result};
pub use statics::StaticTable;
pub use tables::{TableFormat, batch_file, read_table};
