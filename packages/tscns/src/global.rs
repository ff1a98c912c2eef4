//! A process-wide clock for code that does not want to pass a [`Clock`] around.
//!
//! The first call to any function here initializes the clock with the default configuration
//! unless [`init()`] was called first.

use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{Calibrator, Clock};

/// Default initial calibration period of the process-wide clock, in nanoseconds.
pub const INIT_CALIBRATE_NANOS: i64 = 20_000_000;

/// Default calibration interval of the process-wide clock, in nanoseconds.
pub const CALIBRATE_INTERVAL_NANOS: i64 = 3_000_000_000;

#[derive(Debug)]
struct GlobalClock {
    calibrator: Mutex<Calibrator>,

    // Same handle as the calibrator's, kept outside the mutex for lock-free reads.
    clock: Clock,
}

impl GlobalClock {
    fn new(calibrator: Calibrator) -> Self {
        Self {
            clock: calibrator.clock().clone(),
            calibrator: Mutex::new(calibrator),
        }
    }
}

static GLOBAL: OnceLock<GlobalClock> = OnceLock::new();

fn global_clock() -> &'static GlobalClock {
    GLOBAL.get_or_init(|| GlobalClock::new(Calibrator::new()))
}

/// Initializes the process-wide clock, or re-initializes it if it is already in use.
///
/// This blocks for `init_calibrate_ns` while yielding the processor. Re-initializing rebases
/// the clock onto the wall clock, which may move timestamps backwards.
///
/// # Panics
///
/// Panics if `init_calibrate_ns` is not positive or if `calibration_interval_ns` is not longer
/// than one microsecond.
pub fn init(init_calibrate_ns: i64, calibration_interval_ns: i64) {
    let init_calibration = positive_duration(init_calibrate_ns, "init_calibrate_ns");
    let calibration_interval = positive_duration(calibration_interval_ns, "calibration_interval_ns");

    let mut initialized = false;

    let global = GLOBAL.get_or_init(|| {
        initialized = true;

        GlobalClock::new(
            Calibrator::builder()
                .init_calibration(init_calibration)
                .calibration_interval(calibration_interval)
                .build(),
        )
    });

    if !initialized {
        global
            .calibrator
            .lock()
            .init(init_calibration, calibration_interval);
    }
}

/// Calibrates the process-wide clock if the calibration interval has passed.
///
/// Any thread may call this. Before calibration is due it only reads the cycle counter. If
/// another thread is already calibrating, this returns without waiting for it.
pub fn calibrate() {
    let global = global_clock();

    if !global.clock.is_calibration_due() {
        return;
    }

    if let Some(mut calibrator) = global.calibrator.try_lock() {
        calibrator.calibrate();
    }
}

/// Converts a cycle counter value to nanoseconds since the Unix epoch using the process-wide
/// clock.
#[inline]
#[must_use]
pub fn tsc2ns(tick: i64) -> i64 {
    global_clock().clock.tsc2ns(tick)
}

/// Reads the current time in nanoseconds since the Unix epoch from the process-wide clock.
#[inline]
#[must_use]
pub fn rdns() -> i64 {
    global_clock().clock.rdns()
}

/// The currently estimated cycle counter frequency of the process-wide clock, in GHz.
#[must_use]
pub fn ghz() -> f64 {
    global_clock().clock.ghz()
}

/// A handle to the process-wide clock.
///
/// Useful for handing the process-wide clock to code that accepts any [`Clock`].
#[must_use]
pub fn global() -> &'static Clock {
    &global_clock().clock
}

fn positive_duration(ns: i64, name: &str) -> Duration {
    let ns = u64::try_from(ns)
        .ok()
        .filter(|ns| *ns > 0)
        .unwrap_or_else(|| panic!("{name} must be positive, got {ns}"));

    Duration::from_nanos(ns)
}
