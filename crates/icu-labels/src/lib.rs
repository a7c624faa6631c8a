//! Label derivation for the ICU outcome-prediction benchmark.
//!
//! Every transform works on plain slices aligned to the patient's time grid:
//!
//! - **validity**: genuine-measurement flags from cumulative counts
//! - **mask**: overwrite labels at stale timesteps with unknown
//! - **horizon**: hindsight-only outcomes revealed after a fixed horizon
//! - **transition**: upcoming organ failure within a look-ahead window
//! - **urine**: future urine output rate and oliguria flag
//! - **severity**: APACHE II / IV group merge into a phenotype bucket
//! - **los**: remaining length of stay
//! - **assembler**: all of the above for one patient

pub mod assembler;
pub mod horizon;
pub mod los;
pub mod mask;
pub mod severity;
pub mod transition;
pub mod urine;
pub mod validity;

pub use assembler::{AssembleError, LabelAssembler, PatientRecord, assemble_patient_labels};
pub use horizon::horizon_gated;
pub use los::remaining_length_of_stay;
pub use mask::apply_validity_mask;
pub use severity::merge_severity_groups;
pub use transition::{StepWindow, transition_to_failure};
pub use urine::{UrineTargets, UrineWindow, future_urine_output};
pub use validity::measurement_validity;
