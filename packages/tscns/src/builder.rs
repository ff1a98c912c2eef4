use std::time::Duration;

use crate::pal::PlatformFacade;
use crate::{
    CALIBRATION_MARGIN_NS, Calibrator, DEFAULT_CALIBRATION_INTERVAL, DEFAULT_INIT_CALIBRATION,
    InitialRatio,
};

/// Creates instances of [`Calibrator`].
///
/// All parameters are optional. Use `Calibrator::builder()` to create a new instance of this
/// builder.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tscns::Calibrator;
///
/// let mut calibrator = Calibrator::builder()
///     .init_calibration(Duration::from_millis(50))
///     .calibration_interval(Duration::from_secs(1))
///     .build();
///
/// println!("Counter runs at {:.6} GHz", calibrator.ghz());
///
/// // Typically called periodically from a dedicated thread.
/// calibrator.calibrate();
/// ```
#[derive(Debug)]
#[must_use]
pub struct CalibratorBuilder {
    init_calibration_ns: i64,
    calibration_interval_ns: i64,
    known_ns_per_tick: Option<f64>,
}

impl CalibratorBuilder {
    pub(crate) fn new() -> Self {
        Self {
            init_calibration_ns: init_calibration_ns(DEFAULT_INIT_CALIBRATION),
            calibration_interval_ns: calibration_interval_ns(DEFAULT_CALIBRATION_INTERVAL),
            known_ns_per_tick: None,
        }
    }

    /// Sets how long initialization measures the counter frequency against the wall clock
    /// before the clock becomes usable.
    ///
    /// Longer periods give a more accurate initial frequency at the cost of a slower start.
    /// The default is 20 milliseconds.
    ///
    /// # Panics
    ///
    /// Panics if the duration is zero or does not fit in 64-bit nanoseconds.
    pub fn init_calibration(self, duration: Duration) -> Self {
        Self {
            init_calibration_ns: init_calibration_ns(duration),
            ..self
        }
    }

    /// Sets how often calibration is meant to happen.
    ///
    /// [`Calibrator::calibrate()`] is a cheap no-op until this much time has passed since the
    /// previous calibration. The default is 3 seconds.
    ///
    /// # Panics
    ///
    /// Panics if the duration is not longer than one microsecond or does not fit in
    /// 64-bit nanoseconds.
    pub fn calibration_interval(self, duration: Duration) -> Self {
        Self {
            calibration_interval_ns: calibration_interval_ns(duration),
            ..self
        }
    }

    /// Uses a known cycle counter frequency instead of measuring it during initialization.
    ///
    /// Initialization then completes immediately. Calibration still corrects the frequency
    /// over time, so a value from a previous run of the same machine is a good choice.
    ///
    /// # Panics
    ///
    /// Panics if the frequency is not a finite positive number.
    pub fn known_frequency_ghz(self, ghz: f64) -> Self {
        assert!(
            ghz.is_finite() && ghz > 0.0,
            "cycle counter frequency must be a finite positive number of GHz, got {ghz}"
        );

        Self {
            known_ns_per_tick: Some(1.0 / ghz),
            ..self
        }
    }

    /// Initializes the clock and returns its calibrator.
    ///
    /// Unless a known frequency was provided, this blocks for the initial calibration period
    /// while yielding the processor. It never returns if the wall clock does not advance.
    #[must_use]
    pub fn build(self) -> Calibrator {
        self.build_with(PlatformFacade::real())
    }

    pub(crate) fn build_with(self, pal: PlatformFacade) -> Calibrator {
        let initial_ratio = match self.known_ns_per_tick {
            Some(ns_per_tick) => InitialRatio::Known { ns_per_tick },
            None => InitialRatio::Measured {
                init_calibration_ns: self.init_calibration_ns,
            },
        };

        Calibrator::start(pal, initial_ratio, self.calibration_interval_ns)
    }
}

pub(crate) fn init_calibration_ns(duration: Duration) -> i64 {
    assert!(
        !duration.is_zero(),
        "initial calibration period must not be zero"
    );

    duration_as_ns(duration, "initial calibration period")
}

pub(crate) fn calibration_interval_ns(duration: Duration) -> i64 {
    let ns = duration_as_ns(duration, "calibration interval");

    assert!(
        ns > CALIBRATION_MARGIN_NS,
        "calibration interval must be longer than {CALIBRATION_MARGIN_NS} ns, got {duration:?}"
    );

    ns
}

fn duration_as_ns(duration: Duration, what: &str) -> i64 {
    i64::try_from(duration.as_nanos())
        .unwrap_or_else(|_| panic!("{what} of {duration:?} does not fit in 64-bit nanoseconds"))
}
