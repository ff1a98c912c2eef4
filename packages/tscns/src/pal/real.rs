//! The platform that the build is targeting.
//!
//! The cycle counter is selected by processor architecture and the wall clock by operating
//! system. Targets without a usable cycle counter (and Miri, which cannot execute the counter
//! instructions) fall back to using the wall clock as the counter, in which case the conversion
//! ratio converges to exactly one nanosecond per tick.

use std::thread;

use crate::pal::Platform;

#[cfg(all(target_arch = "x86_64", not(miri)))]
mod counter_x86_64;
#[cfg(all(target_arch = "x86_64", not(miri)))]
use counter_x86_64::read_counter;

#[cfg(all(target_arch = "aarch64", not(miri)))]
mod counter_aarch64;
#[cfg(all(target_arch = "aarch64", not(miri)))]
use counter_aarch64::read_counter;

#[cfg(any(miri, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
mod counter_fallback;
#[cfg(any(miri, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
use counter_fallback::read_counter;

#[cfg(all(unix, not(miri)))]
mod wall_unix;
#[cfg(all(unix, not(miri)))]
use wall_unix::read_wall_clock;

#[cfg(all(windows, not(miri)))]
mod wall_windows;
#[cfg(all(windows, not(miri)))]
use wall_windows::read_wall_clock;

#[cfg(any(miri, not(any(unix, windows))))]
mod wall_std;
#[cfg(any(miri, not(any(unix, windows))))]
use wall_std::read_wall_clock;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    #[inline]
    fn tick_now(&self) -> i64 {
        read_counter()
    }

    #[inline]
    fn wall_ns_now(&self) -> i64 {
        read_wall_clock()
    }

    fn yield_now(&self) {
        thread::yield_now();
    }
}
