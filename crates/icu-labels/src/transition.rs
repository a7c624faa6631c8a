//! Look-ahead detection of upcoming organ failure.
//!
//! For each step `t` the detector inspects the half-open window
//! `[t + start, t + end)` of the status series. Indices past the end of the
//! stay are absent and never count as failure; `Unknown` status does not
//! count as failure either.
//!
//! With [`WindowPolicy::AnyFailure`] a step is positive iff some step of its
//! window is in failure. When the window starts at zero that includes `t`
//! itself, so a patient already in failure stays positive until the failure
//! episode ends. [`WindowPolicy::OnsetOnly`] additionally forces steps that
//! are already in failure to zero.

use icu_model::{FailureStatus, Label, WindowPolicy};

/// Look-ahead window in grid steps, relative to the labelled step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepWindow {
    pub start: usize,
    pub end: usize,
}

impl StepWindow {
    pub fn from_hours(lhours: u32, rhours: u32, steps_per_hour: u32) -> Self {
        let steps = steps_per_hour as usize;
        Self {
            start: lhours as usize * steps,
            end: rhours as usize * steps,
        }
    }
}

/// Binary label per step: does failure occur within the look-ahead window?
pub fn transition_to_failure(
    status: &[FailureStatus],
    window: StepWindow,
    policy: WindowPolicy,
) -> Vec<Label> {
    let n = status.len();
    // failures[i] = number of failure steps in status[..i]
    let mut failures = Vec::with_capacity(n + 1);
    failures.push(0usize);
    for state in status {
        let last = failures[failures.len() - 1];
        failures.push(last + usize::from(state.is_failure()));
    }

    (0..n)
        .map(|t| {
            if policy == WindowPolicy::OnsetOnly && status[t].is_failure() {
                return Some(0.0);
            }
            let lo = t.saturating_add(window.start).min(n);
            let hi = t.saturating_add(window.end).min(n);
            let hit = hi > lo && failures[hi] > failures[lo];
            Some(if hit { 1.0 } else { 0.0 })
        })
        .collect()
}
