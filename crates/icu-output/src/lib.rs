//! Output side of label derivation: per-patient label frames, their
//! accumulation over a batch, and the parquet or CSV file they end up in.

pub mod error;
pub mod frame;
pub mod writer;

pub use error::{OutputError, Result};
pub use frame::{LabelAccumulator, label_columns, label_frame};
pub use writer::{label_file, remove_existing, write_labels};
