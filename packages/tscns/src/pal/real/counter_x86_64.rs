use core::arch::x86_64::_rdtsc;

/// Reads the time stamp counter.
///
/// This is not a serializing instruction, so the read may be reordered with surrounding
/// instructions by a few cycles. Callers that care add their own fences.
#[inline(always)]
#[expect(
    clippy::cast_possible_wrap,
    reason = "the counter starts near zero at reset and takes over a century to pass i64::MAX"
)]
pub(crate) fn read_counter() -> i64 {
    // SAFETY: RDTSC is present on every x86-64 processor and has no preconditions.
    let tsc = unsafe { _rdtsc() };

    tsc as i64
}
