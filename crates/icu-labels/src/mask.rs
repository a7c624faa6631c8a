use icu_model::{Label, LabelError};

/// Overwrite labels at invalid timesteps with unknown.
///
/// Both slices must have one entry per timestep.
pub fn apply_validity_mask(labels: &[Label], mask: &[bool]) -> Result<Vec<Label>, LabelError> {
    if labels.len() != mask.len() {
        return Err(LabelError::LengthMismatch {
            labels: labels.len(),
            mask: mask.len(),
        });
    }
    Ok(labels
        .iter()
        .zip(mask)
        .map(|(&label, &valid)| if valid { label } else { None })
        .collect())
}
