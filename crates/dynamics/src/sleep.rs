//! Sleep thresholds and bookkeeping.
//!
//! A body falls asleep after its linear and angular speeds stay below the
//! thresholds for a configurable number of consecutive steps. Sleeping
//! bodies receive no external forces but keep their normal inverse mass in
//! the solver; the solver waking a body back up is detected by comparing
//! its post-solve speed against a multiple of the sleep threshold.

/// Tuning for the sleep pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SleepParams {
    /// Linear speed below which a body counts as resting, m/s.
    pub linear_threshold: f32,
    /// Angular speed below which a body counts as resting, rad/s.
    pub angular_threshold: f32,
    /// Consecutive resting steps before the body sleeps.
    pub steps_to_sleep: u32,
}

impl SleepParams {
    /// Factor over the rest thresholds at which a sleeping body wakes.
    pub(crate) const WAKE_FACTOR: f32 = 2.0;
}

impl Default for SleepParams {
    fn default() -> Self {
        Self {
            linear_threshold: 0.05,
            angular_threshold: 0.05,
            steps_to_sleep: 60,
        }
    }
}
