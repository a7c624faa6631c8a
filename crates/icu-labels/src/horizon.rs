use icu_model::Label;

/// Spread a hindsight-only outcome over a stay, hidden until `horizon_steps`.
///
/// Steps before the horizon are unknown; the rest carry `value`. A stay that
/// never reaches the horizon is unknown throughout.
pub fn horizon_gated(stay_len: usize, value: Label, horizon_steps: usize) -> Vec<Label> {
    (0..stay_len)
        .map(|t| if t < horizon_steps { None } else { value })
        .collect()
}
