/// A snapshot of the parameters a [`Calibrator`][crate::Calibrator] currently uses.
///
/// Mainly useful for diagnostics: logging the calibration state, or checking how far apart
/// successive calibrations moved the ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockParameters {
    pub(crate) ns_per_tick: f64,
    pub(crate) base_tick: i64,
    pub(crate) base_ns: i64,
    pub(crate) base_ns_error: i64,
    pub(crate) calibration_interval_ns: i64,
    pub(crate) next_calibration_tick: i64,
}

impl ClockParameters {
    /// Nanoseconds elapsed per cycle counter tick.
    #[must_use]
    pub fn ns_per_tick(&self) -> f64 {
        self.ns_per_tick
    }

    /// The estimated cycle counter frequency in GHz.
    #[must_use]
    pub fn ghz(&self) -> f64 {
        1.0 / self.ns_per_tick
    }

    /// The counter value that the most recent calibration anchored the mapping to.
    #[must_use]
    pub fn base_tick(&self) -> i64 {
        self.base_tick
    }

    /// Nanoseconds since the Unix epoch that `base_tick` maps to.
    #[must_use]
    pub fn base_ns(&self) -> i64 {
        self.base_ns
    }

    /// The (clamped) difference between the predicted and the observed wall clock at the most
    /// recent calibration. Positive means the clock was running ahead of the wall clock.
    #[must_use]
    pub fn base_ns_error(&self) -> i64 {
        self.base_ns_error
    }

    /// How often calibration is meant to happen, in nanoseconds.
    #[must_use]
    pub fn calibration_interval_ns(&self) -> i64 {
        self.calibration_interval_ns
    }

    /// The counter value before which calibrating is a no-op.
    #[must_use]
    pub fn next_calibration_tick(&self) -> i64 {
        self.next_calibration_tick
    }
}
