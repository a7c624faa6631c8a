//! Future urine output, as a weight-normalised rate and an oliguria flag.

use icu_model::Label;

/// Regression and binary urine targets, one entry per step.
#[derive(Debug, Clone, PartialEq)]
pub struct UrineTargets {
    /// Output over the look-ahead window in mL/kg/h.
    pub rate: Vec<Label>,
    /// 1 when the rate is below the oliguria threshold, else 0.
    pub oliguria: Vec<Label>,
}

/// Look-ahead aggregation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrineWindow {
    /// Window length in grid steps.
    pub steps: usize,
    /// Window length in hours, used to normalise the sum into a rate.
    pub hours: f64,
    pub threshold: f64,
}

/// Aggregate urine volume over `[t, t + steps)` for every step `t`.
///
/// A rate is only defined when the window lies fully inside the stay, at
/// least one genuine urine measurement falls inside it, and the weight at
/// `t` is a positive number. Only volumes at steps where the cumulative count
/// rises are summed, so a carried-forward reading is counted once. Non-finite
/// volumes contribute nothing.
pub fn future_urine_output(
    volume: &[f64],
    cum_counts: &[u64],
    weight: &[f64],
    window: UrineWindow,
) -> UrineTargets {
    let n = volume.len();
    debug_assert_eq!(cum_counts.len(), n);
    debug_assert_eq!(weight.len(), n);

    let mut sums = Vec::with_capacity(n + 1);
    sums.push(0.0f64);
    let mut previous_count = 0;
    for (value, &count) in volume.iter().zip(cum_counts) {
        let last = sums[sums.len() - 1];
        let measured = count > previous_count && value.is_finite();
        sums.push(if measured { last + value } else { last });
        previous_count = count;
    }

    let rate: Vec<Label> = (0..n)
        .map(|t| {
            if window.steps == 0 || t + window.steps > n {
                return None;
            }
            let end = t + window.steps;
            let before = if t == 0 { 0 } else { cum_counts[t - 1] };
            if cum_counts[end - 1] <= before {
                return None;
            }
            let body_weight = weight[t];
            if !body_weight.is_finite() || body_weight <= 0.0 {
                return None;
            }
            Some((sums[end] - sums[t]) / (body_weight * window.hours))
        })
        .collect();

    let oliguria = rate
        .iter()
        .map(|value| value.map(|r| if r < window.threshold { 1.0 } else { 0.0 }))
        .collect();

    UrineTargets { rate, oliguria }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: UrineWindow = UrineWindow {
        steps: 2,
        hours: 1.0,
        threshold: 0.5,
    };

    #[test]
    fn window_past_end_is_unknown() {
        let targets = future_urine_output(&[10.0; 3], &[1, 2, 3], &[10.0; 3], WINDOW);
        assert_eq!(targets.rate, vec![Some(2.0), Some(2.0), None]);
        assert_eq!(targets.oliguria, vec![Some(0.0), Some(0.0), None]);
    }

    #[test]
    fn window_without_measurement_is_unknown() {
        let targets = future_urine_output(&[5.0; 4], &[1, 1, 1, 2], &[10.0; 4], WINDOW);
        // the first count is a measurement at t = 0
        assert_eq!(targets.rate[0], Some(0.5));
        assert_eq!(targets.rate[1], None);
        assert_eq!(targets.rate[2], Some(0.5));
        assert_eq!(targets.oliguria[1], None);
    }

    #[test]
    fn carried_forward_reading_counts_once() {
        let window = UrineWindow {
            steps: 24,
            hours: 2.0,
            threshold: 0.5,
        };
        let mut counts = vec![1u64; 29];
        counts.push(2);
        let mut volume = vec![60.0; 30];
        volume[29] = 10.0;
        let targets = future_urine_output(&volume, &counts, &[60.0; 30], window);
        assert_eq!(targets.rate[0], Some(0.5));
        assert_eq!(targets.oliguria[0], Some(0.0));

        // a slightly smaller reading falls below the cutoff
        let volume = [59.0; 30];
        let targets = future_urine_output(&volume, &counts, &[60.0; 30], window);
        assert_eq!(targets.oliguria[0], Some(1.0));
        // the window starting at step 1 sees only carried-forward values
        assert_eq!(targets.rate[1], None);
    }

    #[test]
    fn missing_weight_is_unknown() {
        let weight = [f64::NAN, 0.0, 70.0, 70.0];
        let targets = future_urine_output(&[7.0; 4], &[1, 2, 3, 4], &weight, WINDOW);
        assert_eq!(targets.rate[0], None);
        assert_eq!(targets.rate[1], None);
        assert_eq!(targets.rate[2], Some(0.2));
        assert_eq!(targets.oliguria[2], Some(1.0));
    }

    #[test]
    fn nan_volume_counts_as_zero() {
        let volume = [f64::NAN, 4.0, 0.0];
        let targets = future_urine_output(&volume, &[0, 1, 1], &[2.0; 3], WINDOW);
        assert_eq!(targets.rate[0], Some(2.0));
    }
}
