use std::{io, mem};

use libc::{CLOCK_REALTIME, timespec};

#[inline]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "nanoseconds since the epoch fit in i64 until the year 2262"
)]
#[allow(
    clippy::useless_conversion,
    reason = "the widths of time_t and c_long differ between targets"
)]
pub(crate) fn read_wall_clock() -> i64 {
    // SAFETY: All-zero is a valid initial value for this type.
    let mut ts: timespec = unsafe { mem::zeroed() };

    // SAFETY: We are passing valid arguments, no other safety requirements.
    let result = unsafe { libc::clock_gettime(CLOCK_REALTIME, &raw mut ts) };

    assert!(result == 0, "{}", io::Error::last_os_error());

    i64::from(ts.tv_sec) * 1_000_000_000 + i64::from(ts.tv_nsec)
}
