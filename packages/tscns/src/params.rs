//! Seqlock-protected storage for the tick to nanosecond conversion parameters.
//!
//! There is exactly one writer (the calibrator) and any number of readers. Readers never block
//! and never write to shared memory, so a reader costs a handful of loads and arithmetic
//! operations even when many threads read at once.
//!
//! The payload fields are atomics accessed with relaxed ordering. The racy reads that are
//! inherent to a seqlock would be undefined behavior with plain fields; relaxed atomics compile
//! to the same plain loads and stores on the targets we care about.

use std::hint;
use std::sync::atomic::{self, AtomicI64, AtomicU32, AtomicU64};

/// The linear mapping from counter ticks to nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Conversion {
    pub(crate) ns_per_tick: f64,
    pub(crate) base_tick: i64,
    pub(crate) base_ns: i64,
}

impl Conversion {
    /// Converts a counter value to nanoseconds since the Unix epoch.
    ///
    /// Monotonically non-decreasing in `tick` as long as `ns_per_tick` is positive: the
    /// float product is monotonic and truncation toward zero preserves that.
    #[inline]
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "tick deltas between calibrations are far below 2^52 and the product is clamped by `as`"
    )]
    pub(crate) fn apply(&self, tick: i64) -> i64 {
        let elapsed_ticks = tick.wrapping_sub(self.base_tick);

        self.base_ns
            .wrapping_add((elapsed_ticks as f64 * self.ns_per_tick) as i64)
    }
}

/// Holds a [`Conversion`] that one writer updates while many readers read it.
///
/// The sequence number is even while the payload is stable and odd while a write is in
/// progress.
#[derive(Debug)]
pub(crate) struct ParamCell {
    sequence: AtomicU32,

    // f64 bit pattern.
    ns_per_tick: AtomicU64,
    base_tick: AtomicI64,
    base_ns: AtomicI64,
}

impl ParamCell {
    pub(crate) fn new(conversion: Conversion) -> Self {
        Self {
            sequence: AtomicU32::new(0),
            ns_per_tick: AtomicU64::new(conversion.ns_per_tick.to_bits()),
            base_tick: AtomicI64::new(conversion.base_tick),
            base_ns: AtomicI64::new(conversion.base_ns),
        }
    }

    /// Reads a consistent snapshot of the conversion parameters.
    ///
    /// If a write is in progress or completes while we are reading, we retry.
    #[inline]
    pub(crate) fn read(&self) -> Conversion {
        loop {
            // Masking off the low bit means a read that starts during a write can never match
            // the sequence number we load afterwards, so no separate "is odd" check is needed.
            let before = self.sequence.load(atomic::Ordering::Acquire) & !1;

            let conversion = Conversion {
                ns_per_tick: f64::from_bits(self.ns_per_tick.load(atomic::Ordering::Relaxed)),
                base_tick: self.base_tick.load(atomic::Ordering::Relaxed),
                base_ns: self.base_ns.load(atomic::Ordering::Relaxed),
            };

            // Pairs with the release fence in `begin_write()`. If any payload load above saw a
            // value stored after that fence, the load below is guaranteed to see the odd
            // sequence number (or a later one) and we retry.
            atomic::fence(atomic::Ordering::Acquire);

            let after = self.sequence.load(atomic::Ordering::Relaxed);

            if before == after {
                return conversion;
            }

            hint::spin_loop();
        }
    }

    /// The current ratio, without the consistency guarantees of `read()`.
    ///
    /// A single field is always internally consistent, which is all a frequency estimate needs.
    pub(crate) fn ns_per_tick(&self) -> f64 {
        f64::from_bits(self.ns_per_tick.load(atomic::Ordering::Relaxed))
    }

    /// Replaces the conversion parameters.
    ///
    /// Must not be called concurrently with another write.
    pub(crate) fn write(&self, conversion: Conversion) {
        let mut guard = self.begin_write();

        guard.set_base_tick(conversion.base_tick);
        guard.set_base_ns(conversion.base_ns);
        guard.set_ns_per_tick(conversion.ns_per_tick);
    }

    /// Starts a write, making the sequence number odd until the returned guard is dropped.
    ///
    /// Must not be called concurrently with another write.
    pub(crate) fn begin_write(&self) -> ParamWriteGuard<'_> {
        // We are the only writer, so nobody else can change the sequence number under us.
        let sequence = self
            .sequence
            .load(atomic::Ordering::Relaxed)
            .wrapping_add(1);

        self.sequence.store(sequence, atomic::Ordering::Release);

        // Orders the odd sequence number before all the payload stores that follow.
        atomic::fence(atomic::Ordering::Release);

        ParamWriteGuard {
            cell: self,
            sequence,
        }
    }

    #[cfg(test)]
    pub(crate) fn sequence(&self) -> u32 {
        self.sequence.load(atomic::Ordering::Relaxed)
    }
}

/// An in-progress write to a [`ParamCell`]. Dropping the guard publishes the new values.
#[derive(Debug)]
pub(crate) struct ParamWriteGuard<'a> {
    cell: &'a ParamCell,

    // The odd value we stored when the write started.
    sequence: u32,
}

impl ParamWriteGuard<'_> {
    pub(crate) fn set_ns_per_tick(&mut self, value: f64) {
        self.cell
            .ns_per_tick
            .store(value.to_bits(), atomic::Ordering::Relaxed);
    }

    pub(crate) fn set_base_tick(&mut self, value: i64) {
        self.cell
            .base_tick
            .store(value, atomic::Ordering::Relaxed);
    }

    pub(crate) fn set_base_ns(&mut self, value: i64) {
        self.cell.base_ns.store(value, atomic::Ordering::Relaxed);
    }
}

impl Drop for ParamWriteGuard<'_> {
    fn drop(&mut self) {
        // Release, so a reader that sees the even number also sees every payload store.
        self.cell
            .sequence
            .store(self.sequence.wrapping_add(1), atomic::Ordering::Release);
    }
}
