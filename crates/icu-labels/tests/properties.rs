//! Property tests for the label transforms.

use icu_model::{FailureStatus, WindowPolicy};
use proptest::prelude::*;

use icu_labels::{
    StepWindow, UrineWindow, apply_validity_mask, future_urine_output, horizon_gated,
    measurement_validity, transition_to_failure,
};

fn cumulative(increments: &[u64]) -> Vec<u64> {
    increments
        .iter()
        .scan(0u64, |acc, inc| {
            *acc += inc;
            Some(*acc)
        })
        .collect()
}

proptest! {
    #[test]
    fn validity_mask_has_input_length(
        increments in prop::collection::vec(0u64..3, 0..300),
        lookback in 1usize..30,
    ) {
        let counts = cumulative(&increments);
        let mask = measurement_validity(&counts, lookback);
        prop_assert_eq!(mask.len(), counts.len());
    }

    #[test]
    fn validity_is_false_on_stale_runs(
        increments in prop::collection::vec(0u64..2, 1..300),
        lookback in 1usize..30,
    ) {
        let counts = cumulative(&increments);
        let mask = measurement_validity(&counts, lookback);
        for t in 0..counts.len() {
            let baseline = if t >= lookback { counts[t - lookback] } else { 0 };
            if counts[t] == baseline {
                prop_assert!(!mask[t]);
            } else {
                prop_assert!(mask[t]);
            }
        }
    }

    #[test]
    fn constant_zero_counts_are_never_valid(len in 0usize..200, lookback in 1usize..30) {
        let mask = measurement_validity(&vec![0; len], lookback);
        prop_assert!(mask.iter().all(|valid| !valid));
    }

    #[test]
    fn masking_keeps_valid_and_hides_invalid(
        entries in prop::collection::vec(
            (prop::option::of(-100.0f64..100.0), any::<bool>()),
            0..200,
        ),
    ) {
        let labels: Vec<_> = entries.iter().map(|(label, _)| *label).collect();
        let mask: Vec<_> = entries.iter().map(|(_, valid)| *valid).collect();
        let masked = apply_validity_mask(&labels, &mask).unwrap();
        prop_assert_eq!(masked.len(), labels.len());
        for i in 0..labels.len() {
            if mask[i] {
                prop_assert_eq!(masked[i], labels[i]);
            } else {
                prop_assert_eq!(masked[i], None);
            }
        }
    }

    #[test]
    fn masking_rejects_unequal_lengths(len in 0usize..50, extra in 1usize..10) {
        let labels = vec![Some(1.0); len];
        let mask = vec![true; len + extra];
        prop_assert!(apply_validity_mask(&labels, &mask).is_err());
    }

    #[test]
    fn horizon_gating(
        stay_len in 0usize..400,
        hours in 0u32..30,
        steps_per_hour in 1u32..13,
        value in -5.0f64..5.0,
    ) {
        let horizon = (hours * steps_per_hour) as usize;
        let labels = horizon_gated(stay_len, Some(value), horizon);
        prop_assert_eq!(labels.len(), stay_len);
        for (t, label) in labels.iter().enumerate() {
            if t < horizon {
                prop_assert_eq!(*label, None);
            } else {
                prop_assert_eq!(*label, Some(value));
            }
        }
    }

    #[test]
    fn stable_status_never_fires(len in 0usize..300, rhours in 1u32..13) {
        let status = vec![FailureStatus::NotFailure; len];
        let window = StepWindow::from_hours(0, rhours, 12);
        let labels = transition_to_failure(&status, window, WindowPolicy::AnyFailure);
        prop_assert_eq!(labels.len(), len);
        prop_assert!(labels.iter().all(|label| *label == Some(0.0)));
    }

    #[test]
    fn single_failure_fires_exactly_inside_window(
        len in 1usize..200,
        k_seed in any::<prop::sample::Index>(),
        start in 0usize..20,
        width in 1usize..30,
    ) {
        let k = k_seed.index(len);
        let mut status = vec![FailureStatus::NotFailure; len];
        status[k] = FailureStatus::Failure;
        let window = StepWindow { start, end: start + width };
        let labels = transition_to_failure(&status, window, WindowPolicy::AnyFailure);
        for t in 0..len {
            let inside = t + start <= k && k < t + start + width;
            prop_assert_eq!(labels[t], Some(if inside { 1.0 } else { 0.0 }));
        }
    }

    #[test]
    fn constant_urine_rate_converges(
        volume in 0.1f64..50.0,
        weight in 20.0f64..150.0,
        hours in 1u32..4,
        steps_per_hour in 1u32..13,
        extra in 0usize..50,
    ) {
        let steps = (hours * steps_per_hour) as usize;
        let len = steps + extra;
        let counts: Vec<u64> = (1..=len as u64).collect();
        let targets = future_urine_output(
            &vec![volume; len],
            &counts,
            &vec![weight; len],
            UrineWindow { steps, hours: f64::from(hours), threshold: 0.5 },
        );
        let expected = volume * f64::from(steps_per_hour) / weight;
        for t in 0..len {
            if t + steps <= len {
                let rate = targets.rate[t].unwrap();
                prop_assert!((rate - expected).abs() <= 1e-9 * expected.max(1.0));
            } else {
                prop_assert_eq!(targets.rate[t], None);
                prop_assert_eq!(targets.oliguria[t], None);
            }
        }
    }
}

#[test]
fn oliguria_flips_at_threshold() {
    let window = UrineWindow {
        steps: 2,
        hours: 1.0,
        threshold: 0.5,
    };
    let counts = [1, 2, 3];
    // 2 x 25 mL over 1 h at 100 kg is exactly 0.5 mL/kg/h
    let at = future_urine_output(&[25.0; 3], &counts, &[100.0; 3], window);
    assert_eq!(at.rate[0], Some(0.5));
    assert_eq!(at.oliguria[0], Some(0.0));

    let below = future_urine_output(&[24.0; 3], &counts, &[100.0; 3], window);
    assert_eq!(below.oliguria[0], Some(1.0));

    let above = future_urine_output(&[26.0; 3], &counts, &[100.0; 3], window);
    assert_eq!(above.oliguria[0], Some(0.0));
}
