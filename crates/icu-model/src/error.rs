use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid configuration: {0}")]
    InvalidOptions(String),
    #[error("invalid severity group code: {0}")]
    InvalidGroupCode(String),
}

/// Contract violations between label arrays.
///
/// These indicate a bug in the caller, never bad input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label array has {labels} entries but validity mask has {mask}")]
    LengthMismatch { labels: usize, mask: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
