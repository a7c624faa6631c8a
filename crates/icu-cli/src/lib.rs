//! Library side of the label derivation CLI: logging setup and the batch pipeline.

pub mod logging;
pub mod pipeline;
