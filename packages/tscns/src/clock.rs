use std::sync::Arc;
use std::sync::atomic::{self, AtomicI64};

use crate::params::{Conversion, ParamCell};
use crate::pal::{BUILD_TARGET_PLATFORM, Platform, PlatformFacade};

/// State shared between a [`Calibrator`][crate::Calibrator] and its [`Clock`]s.
///
/// Aligned to a cache line so that unrelated data does not share the line that every reader
/// loads on every conversion.
#[derive(Debug)]
#[repr(align(64))]
pub(crate) struct ClockState {
    pub(crate) params: ParamCell,

    /// Counter value before which calibrating is a no-op.
    ///
    /// Only the calibrator writes this. It is published so that callers can take the fast path
    /// without access to the calibrator itself.
    pub(crate) next_calibration_tick: AtomicI64,
}

/// Converts processor cycle counter values to nanoseconds since the Unix epoch.
///
/// A `Clock` is a cheap handle to conversion parameters owned by a
/// [`Calibrator`][crate::Calibrator]. Clone it freely and hand it to any number of threads:
/// converting a counter value takes a handful of instructions, never blocks and makes no system
/// calls, even while the calibrator is committing new parameters on another thread.
///
/// The counter values of all processors that read the clock must be synchronized with each
/// other. This holds on modern x86-64 processors with an invariant TSC and on AArch64, but not
/// necessarily across sockets or inside all virtual machines. Use
/// [`verify_processor_sync()`][crate::verify_processor_sync] to check your deployment.
///
/// # Examples
///
/// ```
/// use tscns::Calibrator;
///
/// let calibrator = Calibrator::new();
/// let clock = calibrator.clock().clone();
///
/// let handle = std::thread::spawn(move || clock.rdns());
///
/// let timestamp = handle.join().unwrap();
/// assert!(timestamp > 0);
/// ```
#[derive(Clone, Debug)]
pub struct Clock {
    state: Arc<ClockState>,
    pal: PlatformFacade,
}

impl Clock {
    pub(crate) fn new(pal: PlatformFacade, conversion: Conversion) -> Self {
        Self {
            state: Arc::new(ClockState {
                params: ParamCell::new(conversion),
                next_calibration_tick: AtomicI64::new(i64::MIN),
            }),
            pal,
        }
    }

    /// Converts a cycle counter value to nanoseconds since the Unix epoch.
    ///
    /// The counter value may come from [`tick_now()`] on any thread whose processor counter is
    /// synchronized with the others. For a fixed set of conversion parameters, a larger counter
    /// value never converts to a smaller timestamp.
    #[inline]
    #[must_use]
    pub fn tsc2ns(&self, tick: i64) -> i64 {
        self.state.params.read().apply(tick)
    }

    /// Reads the cycle counter and converts it to nanoseconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub fn rdns(&self) -> i64 {
        self.tsc2ns(self.pal.tick_now())
    }

    /// The currently estimated cycle counter frequency, in GHz.
    #[must_use]
    pub fn ghz(&self) -> f64 {
        1.0 / self.state.params.ns_per_tick()
    }

    /// Whether the calibrator would do real work if asked to calibrate now.
    pub(crate) fn is_calibration_due(&self) -> bool {
        self.pal.tick_now()
            >= self
                .state
                .next_calibration_tick
                .load(atomic::Ordering::Relaxed)
    }

    pub(crate) fn state(&self) -> &ClockState {
        &self.state
    }

    pub(crate) fn pal(&self) -> &PlatformFacade {
        &self.pal
    }
}

/// Reads the raw cycle counter of the processor executing the current thread.
///
/// This is `rdtsc` on x86-64 and the virtual counter of the generic timer on AArch64. Other
/// targets have no usable counter and return the wall clock in nanoseconds instead, in which
/// case the conversion ratio of a calibrated clock is one nanosecond per tick.
#[inline]
#[must_use]
#[cfg_attr(test, mutants::skip)] // Trivial forwarder.
pub fn tick_now() -> i64 {
    BUILD_TARGET_PLATFORM.tick_now()
}

/// Reads the operating system wall clock in nanoseconds since the Unix epoch.
///
/// This is the clock that calibration follows. It is much slower to read than
/// [`Clock::rdns()`] but reflects clock adjustments immediately.
#[inline]
#[must_use]
#[cfg_attr(test, mutants::skip)] // Trivial forwarder.
pub fn wall_ns_now() -> i64 {
    BUILD_TARGET_PLATFORM.wall_ns_now()
}
