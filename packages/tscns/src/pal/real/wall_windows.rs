use windows::Win32::System::SystemInformation::GetSystemTimePreciseAsFileTime;

/// Number of 100 ns intervals between 1601-01-01 (the FILETIME epoch) and 1970-01-01.
const UNIX_EPOCH_AS_FILETIME: i64 = 116_444_736_000_000_000;

#[inline]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_wrap,
    reason = "nanoseconds since the epoch fit in i64 until the year 2262"
)]
pub(crate) fn read_wall_clock() -> i64 {
    // SAFETY: No safety requirements.
    let filetime = unsafe { GetSystemTimePreciseAsFileTime() };

    let intervals =
        (u64::from(filetime.dwHighDateTime) << 32) | u64::from(filetime.dwLowDateTime);

    (intervals as i64 - UNIX_EPOCH_AS_FILETIME) * 100
}
