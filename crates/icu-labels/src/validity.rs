//! Measurement-validity classification from cumulative measurement counts.
//!
//! Imputed tables carry values forward between observations. A timestep is
//! only backed by a genuine measurement if the cumulative count of real
//! observations rose within a short trailing window.

/// Per-timestep validity flags for one cumulative-count column.
///
/// Step `t` is valid iff `counts[t] > counts[t - lookback]`. Before the
/// lookback has elapsed the baseline is the zero count preceding admission,
/// so an early step is valid iff anything has been measured yet. This rule
/// wins over "a constant count is invalid": a constant nonzero count stays
/// valid for the first `lookback` steps and is invalid from then on.
///
/// # Examples
///
/// ```
/// use icu_labels::validity::measurement_validity;
///
/// let mask = measurement_validity(&[0, 1, 1, 1, 2], 2);
/// assert_eq!(mask, vec![false, true, true, false, true]);
/// ```
pub fn measurement_validity(counts: &[u64], lookback: usize) -> Vec<bool> {
    counts
        .iter()
        .enumerate()
        .map(|(t, &count)| {
            let baseline = t.checked_sub(lookback).map_or(0, |idx| counts[idx]);
            count > baseline
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(measurement_validity(&[], 24).is_empty());
    }

    #[test]
    fn no_increments_is_all_invalid() {
        assert!(measurement_validity(&[0; 50], 24).iter().all(|v| !v));
    }

    #[test]
    fn stale_run_becomes_invalid_after_lookback() {
        let counts = [3, 3, 3, 3, 3, 3];
        let mask = measurement_validity(&counts, 2);
        assert_eq!(mask, vec![true, true, false, false, false, false]);
    }

    #[test]
    fn zero_lookback_is_never_valid() {
        assert!(measurement_validity(&[1, 2, 3], 0).iter().all(|v| !v));
    }
}
