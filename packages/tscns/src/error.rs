use thiserror::Error;

/// Errors that can occur when checking the suitability of the cycle counter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The cycle counters of two processors disagree by more than the accepted tolerance.
    ///
    /// Timestamps taken on different processors are not comparable on this system. Cycle
    /// counter based timing should not be used across threads that may run on these processors.
    #[error(
        "cycle counter of processor {processor_id} is {offset_ns} ns off the wall clock while processor {reference_processor_id} is {reference_offset_ns} ns off, exceeding the tolerance of {tolerance_ns} ns"
    )]
    UnsynchronizedCounters {
        /// The processor whose counter is furthest from the reference processor.
        processor_id: u32,

        /// Median difference between the clock on `processor_id` and the wall clock.
        offset_ns: i64,

        /// The processor whose counter is furthest in the other direction.
        reference_processor_id: u32,

        /// Median difference between the clock on `reference_processor_id` and the wall clock.
        reference_offset_ns: i64,

        /// The largest accepted difference between the two offsets.
        tolerance_ns: i64,
    },
}

/// A specialized `Result` type for cycle counter operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
