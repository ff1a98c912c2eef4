use std::arch::asm;

/// Reads the virtual count register of the generic timer.
#[inline(always)]
#[expect(
    clippy::cast_possible_wrap,
    reason = "the counter starts near zero at reset and takes over a century to pass i64::MAX"
)]
pub(crate) fn read_counter() -> i64 {
    let value: u64;

    // SAFETY: CNTVCT_EL0 is readable from EL0 on every mainstream operating system and
    // reading it has no side effects.
    unsafe {
        asm!(
            "mrs {}, cntvct_el0",
            out(reg) value,
            options(nomem, nostack, preserves_flags)
        );
    }

    value as i64
}
