//! Simulated platform for deterministic tests.
//!
//! The simulation keeps its own notion of true elapsed time. Every platform call costs a fixed
//! amount of simulated time, the cycle counter advances at a configurable (and changeable)
//! frequency and the wall clock follows true time plus an adjustable step offset.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::pal::Platform;

/// Wall clock value at the start of every simulation (2023-11-14).
pub(crate) const FAKE_START_WALL_NS: i64 = 1_700_000_000_000_000_000;

/// Counter value at the start of every simulation, as if the machine had been up for a while.
const FAKE_START_TICK: f64 = 5_000_000_000_000.0;

const TICK_READ_COST_NS: i64 = 8;
const WALL_READ_COST_NS: i64 = 40;
const YIELD_COST_NS: i64 = 1_000;

#[derive(Debug)]
struct FakePlatformState {
    elapsed_ns: i64,

    // Fractional, so that frequency changes do not lose sub-tick progress.
    ticks: f64,
    ticks_per_ns: f64,

    wall_step_ns: i64,
    wall_reads: usize,
}

impl FakePlatformState {
    #[expect(
        clippy::cast_precision_loss,
        reason = "simulated durations stay far below 2^52 ns"
    )]
    fn advance_ns(&mut self, ns: i64) {
        self.elapsed_ns = self.elapsed_ns.saturating_add(ns);
        self.ticks += ns as f64 * self.ticks_per_ns;
    }

    fn wall_ns(&self) -> i64 {
        FAKE_START_WALL_NS
            .saturating_add(self.elapsed_ns)
            .saturating_add(self.wall_step_ns)
    }
}

/// Fake implementation of the platform abstraction for testing.
///
/// Clones share the same simulation, so a test can keep a handle to steer time while the code
/// under test owns another.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    /// Creates a simulation whose counter runs at `ghz` ticks per nanosecond.
    pub(crate) fn new(ghz: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                elapsed_ns: 0,
                ticks: FAKE_START_TICK,
                ticks_per_ns: ghz,
                wall_step_ns: 0,
                wall_reads: 0,
            })),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakePlatformState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Lets simulated time pass without any platform calls, as a sleeping thread would.
    pub(crate) fn advance(&self, duration: Duration) {
        let ns = i64::try_from(duration.as_nanos()).expect("test durations fit in i64");
        self.with_state(|s| s.advance_ns(ns));
    }

    /// Changes the counter frequency from now on, simulating frequency drift.
    pub(crate) fn set_ghz(&self, ghz: f64) {
        self.with_state(|s| s.ticks_per_ns = ghz);
    }

    /// Steps the wall clock by `delta_ns` without affecting true time or the counter,
    /// like an NTP step adjustment would.
    pub(crate) fn step_wall_clock(&self, delta_ns: i64) {
        self.with_state(|s| s.wall_step_ns = s.wall_step_ns.saturating_add(delta_ns));
    }

    /// The value the wall clock has right now, without the cost of a read.
    pub(crate) fn wall_ns(&self) -> i64 {
        self.with_state(|s| s.wall_ns())
    }

    /// The value the counter has right now, without the cost of a read.
    pub(crate) fn ticks(&self) -> f64 {
        self.with_state(|s| s.ticks)
    }

    /// The number of wall clock reads performed so far.
    pub(crate) fn wall_reads(&self) -> usize {
        self.with_state(|s| s.wall_reads)
    }
}

impl Platform for FakePlatform {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "simulated tick counts stay far below i64::MAX"
    )]
    fn tick_now(&self) -> i64 {
        self.with_state(|s| {
            s.advance_ns(TICK_READ_COST_NS / 2);
            let value = s.ticks as i64;
            s.advance_ns(TICK_READ_COST_NS / 2);
            value
        })
    }

    // Values are captured halfway through each read, so a bracketing pair of counter reads
    // has the true counter value for the wall clock instant at its midpoint.
    fn wall_ns_now(&self) -> i64 {
        self.with_state(|s| {
            s.advance_ns(WALL_READ_COST_NS / 2);
            let value = s.wall_ns();
            s.advance_ns(WALL_READ_COST_NS / 2);
            s.wall_reads = s.wall_reads.saturating_add(1);
            value
        })
    }

    fn yield_now(&self) {
        self.with_state(|s| s.advance_ns(YIELD_COST_NS));
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn counter_follows_frequency() {
        let platform = FakePlatform::new(3.0);

        let first = platform.tick_now();
        platform.advance(Duration::from_micros(1));
        let second = platform.tick_now();

        // Half of each read, plus 1000 ns of sleep, at 3 ticks per ns.
        assert_eq!(second - first, 3 * (1_000 + TICK_READ_COST_NS));

        platform.set_ghz(1.0);
        platform.advance(Duration::from_micros(1));
        let third = platform.tick_now();

        // The second half of the previous read still ran at the old frequency.
        assert_eq!(
            third - second,
            3 * (TICK_READ_COST_NS / 2) + 1_000 + TICK_READ_COST_NS / 2
        );
    }

    #[test]
    fn wall_clock_follows_true_time_and_steps() {
        let platform = FakePlatform::new(1.0);

        assert_eq!(platform.wall_ns(), FAKE_START_WALL_NS);

        platform.advance(Duration::from_millis(5));
        assert_eq!(platform.wall_ns(), FAKE_START_WALL_NS + 5_000_000);

        platform.step_wall_clock(-10_000_000);
        assert_eq!(platform.wall_ns(), FAKE_START_WALL_NS - 5_000_000);
    }

    #[test]
    fn wall_reads_are_counted_and_cost_time() {
        let platform = FakePlatform::new(1.0);

        let value = platform.wall_ns_now();

        assert_eq!(value, FAKE_START_WALL_NS + WALL_READ_COST_NS / 2);
        assert_eq!(platform.wall_ns(), FAKE_START_WALL_NS + WALL_READ_COST_NS);
        assert_eq!(platform.wall_reads(), 1);
    }

    #[test]
    fn yield_lets_time_pass() {
        let platform = FakePlatform::new(1.0);

        platform.yield_now();

        assert_eq!(platform.wall_ns(), FAKE_START_WALL_NS + YIELD_COST_NS);
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new(1.0);
        let platform2 = platform1.clone();

        platform1.advance(Duration::from_nanos(100));

        assert_eq!(platform2.wall_ns(), FAKE_START_WALL_NS + 100);
    }

    #[test]
    fn panic_while_locked_leaves_simulation_usable() {
        let platform = FakePlatform::new(3.0);

        let result = std::thread::spawn({
            let platform = platform.clone();
            move || platform.with_state(|_| panic!("test code failed mid-step"))
        })
        .join();

        assert!(result.is_err());

        platform.advance(Duration::from_nanos(100));
        assert_eq!(platform.wall_ns(), FAKE_START_WALL_NS + 100);
    }
}
