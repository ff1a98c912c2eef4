use std::sync::atomic;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::builder::{calibration_interval_ns, init_calibration_ns};
use crate::pal::{Platform, PlatformFacade};
use crate::params::Conversion;
use crate::sampling::sync_time;
use crate::{CalibratorBuilder, Clock, ClockParameters};

/// How long initialization measures the counter frequency unless configured otherwise.
pub(crate) const DEFAULT_INIT_CALIBRATION: Duration = Duration::from_millis(20);

/// How often calibration is meant to happen unless configured otherwise.
pub(crate) const DEFAULT_CALIBRATION_INTERVAL: Duration = Duration::from_secs(3);

/// Calibration becomes due this long before a full interval has passed, so a caller that
/// calibrates exactly once per interval is not turned away because of sampling jitter.
pub(crate) const CALIBRATION_MARGIN_NS: i64 = 1_000;

/// Any larger difference between the clock and the wall clock is assumed to be a wall clock
/// step, not drift, and is only corrected up to this amount per calibration.
pub(crate) const MAX_CALIBRATION_ERROR_NS: i64 = 1_000_000;

/// The largest relative change of the tick to nanosecond ratio in one calibration.
///
/// Real frequency drift is measured in parts per million. At the default interval, even a fully
/// clamped error only asks for a change below 0.1%.
pub(crate) const MAX_RATIO_CORRECTION: f64 = 0.01;

/// Where the initial tick to nanosecond ratio comes from.
#[derive(Clone, Copy, Debug)]
pub(crate) enum InitialRatio {
    /// Measure the ratio by sampling the wall clock this many nanoseconds apart.
    Measured { init_calibration_ns: i64 },

    /// Trust a ratio the caller already knows.
    Known { ns_per_tick: f64 },
}

/// Owns the conversion parameters of a [`Clock`] and keeps them in line with the wall clock.
///
/// There is exactly one calibrator per clock. Reading time happens through the [`Clock`] handles
/// obtained from [`clock()`][Self::clock], which stay valid and keep observing new parameters
/// for as long as they live, even after the calibrator is dropped.
///
/// Call [`calibrate()`][Self::calibrate] periodically, for example once per second from a
/// housekeeping thread. It is a cheap no-op until the calibration interval has passed. Each real
/// calibration compares the clock against the wall clock and adjusts the rate so that the
/// difference shrinks by the next calibration. Small differences (such as those from NTP
/// slewing) are absorbed smoothly. Larger ones (such as from a wall clock step) are corrected
/// gradually, at most one millisecond per calibration, and never by moving the clock backwards.
///
/// # Examples
///
/// ```
/// use tscns::Calibrator;
///
/// let mut calibrator = Calibrator::new();
/// let clock = calibrator.clock().clone();
///
/// let start = clock.rdns();
/// calibrator.calibrate();
/// let end = clock.rdns();
///
/// assert!(end >= start);
/// ```
#[derive(Debug)]
pub struct Calibrator {
    clock: Clock,

    // Writer-side copy of the published parameters, so we never need to read our own seqlock.
    conversion: Conversion,

    // Clamped error observed at the most recent calibration.
    base_ns_error: i64,

    calibration_interval_ns: i64,
}

impl Calibrator {
    /// Initializes a new clock with the default configuration.
    ///
    /// This blocks for the initial calibration period (20 milliseconds) while yielding the
    /// processor. Use [`builder()`][Self::builder] to customize the configuration.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a calibrator with a custom configuration.
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn builder() -> CalibratorBuilder {
        CalibratorBuilder::new()
    }

    pub(crate) fn start(
        pal: PlatformFacade,
        initial_ratio: InitialRatio,
        calibration_interval_ns: i64,
    ) -> Self {
        let conversion = initial_conversion(&pal, initial_ratio);

        let mut calibrator = Self {
            clock: Clock::new(pal, conversion),
            conversion,
            base_ns_error: 0,
            calibration_interval_ns,
        };

        calibrator.commit(conversion, 0);
        calibrator
    }

    /// Measures the counter frequency again from scratch and restarts calibration.
    ///
    /// The clock is rebased onto the wall clock, so unlike [`calibrate()`][Self::calibrate]
    /// this may move timestamps backwards. Existing [`Clock`] handles observe the new
    /// parameters.
    ///
    /// This blocks for `init_calibration` while yielding the processor.
    ///
    /// # Panics
    ///
    /// Panics if `init_calibration` is zero, if `calibration_interval` is not longer than one
    /// microsecond or if either does not fit in 64-bit nanoseconds.
    pub fn init(&mut self, init_calibration: Duration, calibration_interval: Duration) {
        let initial_ratio = InitialRatio::Measured {
            init_calibration_ns: init_calibration_ns(init_calibration),
        };
        self.calibration_interval_ns = calibration_interval_ns(calibration_interval);

        let conversion = initial_conversion(self.clock.pal(), initial_ratio);
        self.commit(conversion, 0);
    }

    /// Corrects the clock toward the wall clock if the calibration interval has passed.
    ///
    /// Before that, this only reads the cycle counter and returns. Timestamps produced by the
    /// clock never move backwards because of a calibration.
    pub fn calibrate(&mut self) {
        if !self.clock.is_calibration_due() {
            return;
        }

        let (tick, wall_ns) = sync_time(self.clock.pal());

        let predicted_ns = self.conversion.apply(tick);
        let raw_error_ns = predicted_ns.saturating_sub(wall_ns);
        let error_ns = raw_error_ns.clamp(-MAX_CALIBRATION_ERROR_NS, MAX_CALIBRATION_ERROR_NS);

        if error_ns != raw_error_ns {
            warn!(
                error_ns = raw_error_ns,
                limit_ns = MAX_CALIBRATION_ERROR_NS,
                "clock differs from the wall clock by more than the correction limit, assuming the wall clock was stepped"
            );
        }

        let ns_per_tick = corrected_ratio(self.conversion, tick, error_ns, self.base_ns_error);

        // Without clamping, `wall_ns + error_ns` is the prediction itself. With clamping it is
        // not, and if the wall clock went backwards we stay on the prediction. The corrected
        // ratio then slews the clock toward the wall clock instead of jumping back.
        let base_ns = wall_ns.saturating_add(error_ns).max(predicted_ns);

        trace!(
            error_ns,
            previous_error_ns = self.base_ns_error,
            ghz = 1.0 / ns_per_tick,
            jump_ns = base_ns.saturating_sub(predicted_ns),
            "calibrated"
        );

        self.commit(
            Conversion {
                ns_per_tick,
                base_tick: tick,
                base_ns,
            },
            error_ns,
        );
    }

    /// The clock that this calibrator maintains.
    ///
    /// Clone the returned handle to read time from other threads.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The currently estimated cycle counter frequency, in GHz.
    #[must_use]
    pub fn ghz(&self) -> f64 {
        1.0 / self.conversion.ns_per_tick
    }

    /// A snapshot of the current calibration state.
    #[must_use]
    pub fn parameters(&self) -> ClockParameters {
        ClockParameters {
            ns_per_tick: self.conversion.ns_per_tick,
            base_tick: self.conversion.base_tick,
            base_ns: self.conversion.base_ns,
            base_ns_error: self.base_ns_error,
            calibration_interval_ns: self.calibration_interval_ns,
            next_calibration_tick: self
                .clock
                .state()
                .next_calibration_tick
                .load(atomic::Ordering::Relaxed),
        }
    }

    fn commit(&mut self, conversion: Conversion, base_ns_error: i64) {
        let state = self.clock.state();

        state.params.write(conversion);
        state.next_calibration_tick.store(
            next_calibration_tick(conversion, self.calibration_interval_ns),
            atomic::Ordering::Relaxed,
        );

        self.conversion = conversion;
        self.base_ns_error = base_ns_error;
    }
}

impl Default for Calibrator {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn default() -> Self {
        Self::new()
    }
}

fn initial_conversion(pal: &PlatformFacade, initial_ratio: InitialRatio) -> Conversion {
    loop {
        let (base_tick, base_ns) = sync_time(pal);

        let ns_per_tick = match initial_ratio {
            InitialRatio::Known { ns_per_tick } => ns_per_tick,
            InitialRatio::Measured {
                init_calibration_ns,
            } => {
                let expire_ns = base_ns.saturating_add(init_calibration_ns);

                while pal.wall_ns_now() < expire_ns {
                    pal.yield_now();
                }

                let (tick, wall_ns) = sync_time(pal);
                measured_ratio(base_tick, base_ns, tick, wall_ns)
            }
        };

        // A wall clock step during the measurement can produce garbage. Start over.
        if !(ns_per_tick.is_finite() && ns_per_tick > 0.0) {
            warn!(
                ns_per_tick,
                "initial frequency measurement failed, measuring again"
            );
            continue;
        }

        debug!(
            ghz = 1.0 / ns_per_tick,
            ns_per_tick,
            known_frequency = matches!(initial_ratio, InitialRatio::Known { .. }),
            "clock initialized"
        );

        return Conversion {
            ns_per_tick,
            base_tick,
            base_ns,
        };
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "a measurement spans far less than 2^52 ns or ticks"
)]
fn measured_ratio(base_tick: i64, base_ns: i64, tick: i64, wall_ns: i64) -> f64 {
    wall_ns.wrapping_sub(base_ns) as f64 / tick.wrapping_sub(base_tick) as f64
}

/// Adjusts the ratio so that the error observed now is expected to be gone by the next
/// calibration, assuming it recurs at the same interval.
///
/// The error accumulated over the last interval from a ratio that was off by a constant amount.
/// Correcting by the error alone would stop further growth but leave the current offset in place,
/// so we correct by twice the error, minus the previous error that the previous correction
/// already accounted for.
///
/// With short calibration intervals a clamped error can still be large relative to the elapsed
/// time, so the change per calibration is limited to `MAX_RATIO_CORRECTION`. This keeps the ratio
/// positive and the clock moving forward.
#[expect(
    clippy::cast_precision_loss,
    reason = "calibration intervals and errors are far below 2^52"
)]
fn corrected_ratio(current: Conversion, tick: i64, error_ns: i64, previous_error_ns: i64) -> f64 {
    let elapsed_ns = tick.wrapping_sub(current.base_tick) as f64 * current.ns_per_tick;
    let error_trend_ns = error_ns.saturating_mul(2).saturating_sub(previous_error_ns) as f64;

    let correction = error_trend_ns / elapsed_ns;

    if !correction.is_finite() || elapsed_ns <= 0.0 {
        return current.ns_per_tick;
    }

    let bounded = correction.clamp(-MAX_RATIO_CORRECTION, MAX_RATIO_CORRECTION);

    if bounded != correction {
        warn!(
            correction,
            limit = MAX_RATIO_CORRECTION,
            elapsed_ns,
            "ratio correction exceeds the limit, the calibration interval may be too short"
        );
    }

    current.ns_per_tick * (1.0 - bounded)
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "calibration intervals are far below 2^52 ns and the tick count is clamped by `as`"
)]
fn next_calibration_tick(conversion: Conversion, calibration_interval_ns: i64) -> i64 {
    let ticks = calibration_interval_ns.saturating_sub(CALIBRATION_MARGIN_NS) as f64
        / conversion.ns_per_tick;

    conversion.base_tick.saturating_add(ticks as i64)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::{FAKE_START_WALL_NS, FakePlatform};

    assert_impl_all!(Calibrator: Send, Sync);

    /// A bit more than the default calibration interval, so that every step makes calibration
    /// due even while the ratio is still being corrected.
    const STEP: Duration = Duration::from_millis(3_010);

    fn start(platform: &FakePlatform) -> Calibrator {
        Calibrator::builder().build_with(platform.clone().into())
    }

    /// Difference between the clock and the wall clock, positive when the clock is ahead.
    fn offset_ns(platform: &FakePlatform, clock: &Clock) -> i64 {
        let (tick, wall_ns) = sync_time(platform);
        clock.tsc2ns(tick) - wall_ns
    }

    fn conversion_of(parameters: ClockParameters) -> Conversion {
        Conversion {
            ns_per_tick: parameters.ns_per_tick(),
            base_tick: parameters.base_tick(),
            base_ns: parameters.base_ns(),
        }
    }

    /// Calibrates and asserts that timestamps did not move backwards in the process.
    fn calibrate_continuously(platform: &FakePlatform, calibrator: &mut Calibrator) {
        let before = calibrator.clock().tsc2ns(platform.tick_now());
        calibrator.calibrate();
        let after = calibrator.clock().tsc2ns(platform.tick_now());

        assert!(after >= before, "clock went back from {before} to {after}");
    }

    #[test]
    fn init_measures_true_frequency() {
        let platform = FakePlatform::new(3.0);

        let calibrator = start(&platform);

        assert!((calibrator.ghz() - 3.0).abs() < 1e-9);
        assert!((calibrator.clock().ghz() - 3.0).abs() < 1e-9);
        assert_eq!(calibrator.parameters().base_ns_error(), 0);
        assert!(offset_ns(&platform, calibrator.clock()).abs() < 1_000);
    }

    #[test]
    fn init_waits_for_calibration_period() {
        let platform = FakePlatform::new(3.0);

        drop(
            Calibrator::builder()
                .init_calibration(Duration::from_millis(50))
                .build_with(platform.clone().into()),
        );

        let elapsed_ns = platform.wall_ns() - FAKE_START_WALL_NS;
        assert!(elapsed_ns >= 50_000_000);
        assert!(elapsed_ns < 51_000_000);
    }

    #[test]
    fn known_frequency_skips_measurement() {
        let platform = FakePlatform::new(3.0);

        let calibrator = Calibrator::builder()
            .known_frequency_ghz(3.0)
            .build_with(platform.clone().into());

        // A single sample and no waiting.
        assert_eq!(platform.wall_reads(), 3);
        assert!(platform.wall_ns() - FAKE_START_WALL_NS < 1_000);

        assert!((calibrator.ghz() - 3.0).abs() < 1e-9);
        assert!(offset_ns(&platform, calibrator.clock()).abs() < 1_000);
    }

    #[test]
    fn inaccurate_known_frequency_is_corrected() {
        let platform = FakePlatform::new(3.0);

        // 0.1% off, so the clock falls behind by 3 ms per interval until corrected.
        let mut calibrator = Calibrator::builder()
            .known_frequency_ghz(3.003)
            .build_with(platform.clone().into());

        for _ in 0..10 {
            platform.advance(STEP);
            calibrate_continuously(&platform, &mut calibrator);
        }

        assert!((calibrator.ghz() - 3.0).abs() < 3e-5);
        assert!(offset_ns(&platform, calibrator.clock()).abs() < 100_000);
    }

    #[test]
    fn publishes_next_calibration_tick() {
        let platform = FakePlatform::new(3.0);

        let parameters = start(&platform).parameters();

        let expected = parameters.base_tick() + 3 * (3_000_000_000 - CALIBRATION_MARGIN_NS);
        assert!((parameters.next_calibration_tick() - expected).abs() <= 1);
    }

    #[test]
    fn calibrate_before_due_is_noop() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = start(&platform);

        let parameters = calibrator.parameters();
        let wall_reads = platform.wall_reads();

        platform.advance(Duration::from_secs(2));
        calibrator.calibrate();

        assert_eq!(platform.wall_reads(), wall_reads);
        assert_eq!(calibrator.parameters(), parameters);
    }

    #[test]
    fn calibrate_when_due_rebases() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = start(&platform);

        let before = calibrator.parameters();
        let wall_reads = platform.wall_reads();

        platform.advance(STEP);
        calibrator.calibrate();

        let after = calibrator.parameters();

        assert_eq!(platform.wall_reads(), wall_reads + 3);
        assert!(after.base_tick() > before.base_tick());
        assert!(after.next_calibration_tick() > before.next_calibration_tick());
        assert!(after.base_ns_error().abs() <= 2);
        assert!((after.ghz() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn clock_handles_observe_calibration() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = start(&platform);
        let clock = calibrator.clock().clone();

        platform.set_ghz(3.0003);
        platform.advance(STEP);
        calibrator.calibrate();

        assert_eq!(clock.ghz().to_bits(), calibrator.ghz().to_bits());
        assert!(clock.ghz() > 3.0);
    }

    /// Offset from the wall clock after 30 seconds of a counter running 0.01% fast.
    fn offset_after_drift(calibrate: bool) -> i64 {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = start(&platform);

        platform.set_ghz(3.0003);

        for _ in 0..10 {
            platform.advance(STEP);

            if calibrate {
                calibrate_continuously(&platform, &mut calibrator);
            }
        }

        offset_ns(&platform, calibrator.clock())
    }

    #[test]
    fn calibration_tracks_frequency_drift() {
        let uncalibrated = offset_after_drift(false);
        let calibrated = offset_after_drift(true);

        // 0.01% of 30 seconds.
        assert!(uncalibrated > 2_000_000, "uncalibrated offset {uncalibrated}");
        assert!(calibrated.abs() < 20_000, "calibrated offset {calibrated}");
    }

    #[test]
    fn calibration_tracks_slower_counter() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = start(&platform);

        platform.set_ghz(2.9997);

        for _ in 0..10 {
            platform.advance(STEP);
            calibrate_continuously(&platform, &mut calibrator);
        }

        assert!(calibrator.ghz() < 3.0);
        assert!(offset_ns(&platform, calibrator.clock()).abs() < 20_000);
    }

    /// Sets up a calibrated clock whose previous error is practically zero.
    fn settled(platform: &FakePlatform) -> Calibrator {
        let mut calibrator = start(platform);

        platform.advance(STEP);
        calibrator.calibrate();

        calibrator
    }

    #[test]
    fn forward_wall_step_is_clamped() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = settled(&platform);

        platform.step_wall_clock(10_000_000);
        platform.advance(STEP);

        let before = calibrator.parameters();
        calibrator.calibrate();
        let after = calibrator.parameters();

        assert_eq!(after.base_ns_error(), -MAX_CALIBRATION_ERROR_NS);

        // The clock jumps forward by the part of the step beyond the correction limit.
        let predicted_ns = conversion_of(before).apply(after.base_tick());
        let jump_ns = after.base_ns() - predicted_ns;
        assert!((jump_ns - 9_000_000).abs() < 100, "jump {jump_ns}");

        // The ratio only corrects for the clamped error, not the full step.
        let relative_change = after.ns_per_tick() / before.ns_per_tick() - 1.0;
        let expected_change = 2.0 * 1_000_000.0 / 3_010_000_000.0;
        assert!(
            (relative_change - expected_change).abs() < 1e-8,
            "ratio changed by {relative_change}"
        );
    }

    #[test]
    fn backward_wall_step_never_moves_clock_back() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = settled(&platform);

        platform.step_wall_clock(-10_000_000);
        platform.advance(STEP);

        let before = calibrator.parameters();
        calibrate_continuously(&platform, &mut calibrator);
        let after = calibrator.parameters();

        assert_eq!(after.base_ns_error(), MAX_CALIBRATION_ERROR_NS);
        assert_eq!(
            after.base_ns(),
            conversion_of(before).apply(after.base_tick())
        );
        assert!(after.ns_per_tick() < before.ns_per_tick());

        // The clock slews back onto the wall clock over the following calibrations.
        for _ in 0..20 {
            platform.advance(STEP);
            calibrate_continuously(&platform, &mut calibrator);
        }

        let offset = offset_ns(&platform, calibrator.clock());
        assert!(offset.abs() < 100_000, "offset {offset}");
    }

    #[test]
    fn short_interval_backward_step_keeps_ratio_positive() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = Calibrator::builder()
            .calibration_interval(Duration::from_millis(1))
            .build_with(platform.clone().into());

        let step = Duration::from_micros(1_500);

        platform.advance(step);
        calibrate_continuously(&platform, &mut calibrator);

        platform.step_wall_clock(-5_000_000);

        for _ in 0..50 {
            platform.advance(step);

            let before = calibrator.parameters();
            calibrate_continuously(&platform, &mut calibrator);
            let after = calibrator.parameters();

            assert!(after.ns_per_tick() > 0.0, "ratio {}", after.ns_per_tick());
            assert!(after.next_calibration_tick() > after.base_tick());

            let relative_change = (after.ns_per_tick() / before.ns_per_tick() - 1.0).abs();
            assert!(
                relative_change <= MAX_RATIO_CORRECTION + 1e-12,
                "ratio changed by {relative_change}"
            );
        }

        assert!(calibrator.ghz() > 0.0);
    }

    #[test]
    fn init_restarts_calibration() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = settled(&platform);
        let clock = calibrator.clock().clone();

        platform.set_ghz(2.0);
        platform.step_wall_clock(-10_000_000);

        let wall_before = platform.wall_ns();
        calibrator.init(Duration::from_millis(50), Duration::from_secs(1));

        assert!(platform.wall_ns() - wall_before >= 50_000_000);

        let parameters = calibrator.parameters();
        assert_eq!(parameters.calibration_interval_ns(), 1_000_000_000);
        assert_eq!(parameters.base_ns_error(), 0);
        assert!((clock.ghz() - 2.0).abs() < 1e-9);

        // Rebased onto the stepped wall clock right away.
        assert!(offset_ns(&platform, &clock).abs() < 1_000);
    }

    #[test]
    #[should_panic]
    fn init_with_zero_period_panics() {
        let platform = FakePlatform::new(3.0);
        let mut calibrator = start(&platform);

        calibrator.init(Duration::ZERO, Duration::from_secs(1));
    }

    #[test]
    fn corrected_ratio_without_error_is_unchanged() {
        let current = Conversion {
            ns_per_tick: 0.5,
            base_tick: 0,
            base_ns: 0,
        };

        assert_eq!(corrected_ratio(current, 1_000_000, 0, 0).to_bits(), 0.5_f64.to_bits());
    }

    #[test]
    fn corrected_ratio_counts_error_twice_minus_previous() {
        let current = Conversion {
            ns_per_tick: 1.0,
            base_tick: 0,
            base_ns: 0,
        };

        // 10 000 ns elapsed, error trend 2 * 10 - 4 = 16 ns.
        let ratio = corrected_ratio(current, 10_000, 10, 4);

        assert!((ratio - 0.9984).abs() < 1e-12);
    }

    #[test]
    fn corrected_ratio_limits_large_corrections() {
        let current = Conversion {
            ns_per_tick: 0.5,
            base_tick: 0,
            base_ns: 0,
        };

        // 1 ms elapsed against a full clamped error in either direction.
        let slower = corrected_ratio(current, 2_000_000, MAX_CALIBRATION_ERROR_NS, 0);
        let faster = corrected_ratio(current, 2_000_000, -MAX_CALIBRATION_ERROR_NS, 0);

        assert!((slower - 0.5 * (1.0 - MAX_RATIO_CORRECTION)).abs() < 1e-12);
        assert!((faster - 0.5 * (1.0 + MAX_RATIO_CORRECTION)).abs() < 1e-12);
    }

    #[test]
    fn corrected_ratio_without_elapsed_time_is_unchanged() {
        let current = Conversion {
            ns_per_tick: 0.5,
            base_tick: 1_000,
            base_ns: 0,
        };

        assert_eq!(corrected_ratio(current, 1_000, 0, 0).to_bits(), 0.5_f64.to_bits());
        assert_eq!(corrected_ratio(current, 1_000, 500, 0).to_bits(), 0.5_f64.to_bits());
        assert_eq!(corrected_ratio(current, 900, 500, 0).to_bits(), 0.5_f64.to_bits());
    }

    #[test]
    fn measured_ratio_divides_elapsed_time_by_ticks() {
        assert!((measured_ratio(1_000, 5_000, 4_000, 6_000) - 1.0 / 3.0).abs() < 1e-12);
    }
}
