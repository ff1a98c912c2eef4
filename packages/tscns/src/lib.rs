#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wall clock time in nanoseconds, read from the processor cycle counter.
//!
//! Reading the operating system wall clock costs tens of nanoseconds or more. Reading the
//! processor cycle counter (`rdtsc` on x86-64, `cntvct_el0` on AArch64) costs a few. This crate
//! maps cycle counter values to nanoseconds since the Unix epoch, so a timestamp costs little
//! more than the counter read while staying close to the wall clock:
//!
//! * Initialization measures the counter frequency against the wall clock.
//! * Periodic calibration corrects frequency drift and follows wall clock adjustments, without
//!   ever moving timestamps backwards.
//! * Reading time is lock-free and wait-free in practice. Any number of threads can read while
//!   one thread calibrates.
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms for
//! high-performance hardware-aware programming in Rust.
//!
//! # Example
//!
//! A [`Calibrator`] owns the conversion parameters. [`Clock`] handles read time from any thread.
//!
//! ```
//! use tscns::Calibrator;
//!
//! let mut calibrator = Calibrator::new();
//! let clock = calibrator.clock().clone();
//!
//! let reader = std::thread::spawn(move || {
//!     let start = clock.rdns();
//!     let end = clock.rdns();
//!     end - start
//! });
//!
//! // Somewhere, call this periodically. It is cheap until calibration is due.
//! calibrator.calibrate();
//!
//! let elapsed_ns = reader.join().unwrap();
//! assert!(elapsed_ns >= 0);
//! ```
//!
//! # Process-wide clock
//!
//! For code that prefers not to pass a [`Clock`] around, free functions operate on a lazily
//! initialized process-wide clock:
//!
//! ```
//! tscns::init(tscns::INIT_CALIBRATE_NANOS, tscns::CALIBRATE_INTERVAL_NANOS);
//!
//! let tick = tscns::tick_now();
//! let ns = tscns::tsc2ns(tick);
//! println!("{ns} ns since the Unix epoch, counter at {:.3} GHz", tscns::ghz());
//!
//! tscns::calibrate();
//! ```
//!
//! # Platform requirements
//!
//! Timestamps are only comparable across threads if the cycle counters of all processors are
//! synchronized. Modern x86-64 processors with an invariant TSC and AArch64 systems provide
//! this, but some multi-socket systems and virtual machines do not. Call
//! [`verify_processor_sync()`] to check a system.
//!
//! On targets without a supported cycle counter, the wall clock stands in for the counter. The
//! API works the same but reading time is no faster than reading the wall clock.

mod builder;
mod calibrator;
mod clock;
mod clock_parameters;
mod error;
mod global;
mod pal;
mod params;
mod processor_sync;
mod sampling;

pub use builder::*;
pub use calibrator::*;
pub use clock::*;
pub use clock_parameters::*;
pub use error::*;
pub use global::*;
pub use processor_sync::*;
