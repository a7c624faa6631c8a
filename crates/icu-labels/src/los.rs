use icu_model::Label;

/// Remaining length of stay in hours, decaying linearly to zero.
///
/// Produces `stay_len` evenly spaced values from `stay_len / steps_per_hour`
/// down to `0.0`; a single-step stay yields only the start value.
pub fn remaining_length_of_stay(stay_len: usize, steps_per_hour: u32) -> Vec<Label> {
    let start = stay_len as f64 / f64::from(steps_per_hour);
    match stay_len {
        0 => Vec::new(),
        1 => vec![Some(start)],
        _ => {
            let step = start / (stay_len - 1) as f64;
            (0..stay_len)
                .map(|t| {
                    if t == stay_len - 1 {
                        Some(0.0)
                    } else {
                        Some(start - t as f64 * step)
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_to_zero() {
        let los = remaining_length_of_stay(5, 2);
        assert_eq!(
            los,
            vec![Some(2.5), Some(1.875), Some(1.25), Some(0.625), Some(0.0)]
        );
    }

    #[test]
    fn degenerate_stays() {
        assert!(remaining_length_of_stay(0, 12).is_empty());
        assert_eq!(remaining_length_of_stay(1, 12), vec![Some(1.0 / 12.0)]);
    }
}
