use std::panic;
use std::time::Duration;

use many_cpus::ProcessorSet;
use tracing::{debug, warn};

use crate::sampling::sync_time;
use crate::{Clock, Error, Result};

/// How many samples each processor takes. The median is used, so occasional interruptions of
/// the sampling thread do not affect the result.
const SAMPLES_PER_PROCESSOR: usize = 16;

/// How far the clock on one processor is from the wall clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProcessorOffset {
    processor_id: u32,
    offset_ns: i64,
}

impl ProcessorOffset {
    /// The processor the offset was measured on.
    #[must_use]
    pub fn processor_id(&self) -> u32 {
        self.processor_id
    }

    /// Median difference between the clock and the wall clock on this processor. Positive
    /// means the clock is ahead of the wall clock.
    #[must_use]
    pub fn offset_ns(&self) -> i64 {
        self.offset_ns
    }
}

/// Per-processor offsets measured by [`verify_processor_sync()`].
#[derive(Clone, Debug)]
pub struct ProcessorSyncReport {
    offsets: Box<[ProcessorOffset]>,
}

impl ProcessorSyncReport {
    /// The measured offset of every processor, in no particular order.
    #[must_use]
    pub fn offsets(&self) -> &[ProcessorOffset] {
        &self.offsets
    }

    /// The difference between the largest and the smallest offset.
    #[must_use]
    pub fn max_skew_ns(&self) -> i64 {
        match extremes(&self.offsets) {
            Some((min, max)) => max.offset_ns.saturating_sub(min.offset_ns),
            None => 0,
        }
    }
}

/// Checks whether the cycle counters of all processors available to this process agree with
/// each other.
///
/// One thread is pinned to every processor and measures the difference between `clock` and the
/// wall clock there. If the counters are synchronized, these offsets are the same everywhere
/// except for measurement noise. The wall clock itself is the common reference, so the check
/// does not depend on the accuracy of the current calibration.
///
/// Use a tolerance of a few microseconds for a strict check. Busy or virtualized systems can
/// add noise of that magnitude even with synchronized counters.
///
/// # Errors
///
/// Returns [`Error::UnsynchronizedCounters`] naming the two processors furthest apart if they
/// differ by more than `tolerance`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tscns::Calibrator;
///
/// let calibrator = Calibrator::new();
///
/// match tscns::verify_processor_sync(calibrator.clock(), Duration::from_millis(100)) {
///     Ok(report) => println!("Counters agree within {} ns", report.max_skew_ns()),
///     Err(error) => println!("Do not compare timestamps across processors: {error}"),
/// }
/// ```
pub fn verify_processor_sync(clock: &Clock, tolerance: Duration) -> Result<ProcessorSyncReport> {
    let tolerance_ns = i64::try_from(tolerance.as_nanos()).unwrap_or(i64::MAX);

    let threads = ProcessorSet::default().spawn_threads({
        let clock = clock.clone();

        move |processor| ProcessorOffset {
            processor_id: processor.id(),
            offset_ns: median_offset_ns(&clock),
        }
    });

    let offsets = threads
        .into_vec()
        .into_iter()
        .map(|thread| thread.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
        .collect::<Vec<_>>();

    evaluate(offsets, tolerance_ns)
}

fn median_offset_ns(clock: &Clock) -> i64 {
    let mut offsets = [0_i64; SAMPLES_PER_PROCESSOR];

    for offset in &mut offsets {
        let (tick, wall_ns) = sync_time(clock.pal());
        *offset = clock.tsc2ns(tick).saturating_sub(wall_ns);
    }

    *offsets.select_nth_unstable(SAMPLES_PER_PROCESSOR / 2).1
}

fn extremes(offsets: &[ProcessorOffset]) -> Option<(ProcessorOffset, ProcessorOffset)> {
    let min = offsets.iter().min_by_key(|o| o.offset_ns)?;
    let max = offsets.iter().max_by_key(|o| o.offset_ns)?;

    Some((*min, *max))
}

fn evaluate(offsets: Vec<ProcessorOffset>, tolerance_ns: i64) -> Result<ProcessorSyncReport> {
    let report = ProcessorSyncReport {
        offsets: offsets.into_boxed_slice(),
    };

    let skew_ns = report.max_skew_ns();

    if skew_ns > tolerance_ns {
        if let Some((min, max)) = extremes(&report.offsets) {
            warn!(
                skew_ns,
                tolerance_ns,
                processor_id = max.processor_id,
                reference_processor_id = min.processor_id,
                "cycle counters are not synchronized across processors"
            );

            return Err(Error::UnsynchronizedCounters {
                processor_id: max.processor_id,
                offset_ns: max.offset_ns,
                reference_processor_id: min.processor_id,
                reference_offset_ns: min.offset_ns,
                tolerance_ns,
            });
        }
    }

    debug!(
        processors = report.offsets.len(),
        skew_ns, "cycle counters are synchronized across processors"
    );

    Ok(report)
}
