use std::fmt::Debug;

/// Access to the processor cycle counter and the operating system wall clock.
///
/// All platform interaction goes through this trait, enabling it to be simulated in tests.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Reads the raw cycle counter of the processor executing the current thread.
    fn tick_now(&self) -> i64;

    /// Reads the wall clock as nanoseconds since the Unix epoch.
    fn wall_ns_now(&self) -> i64;

    /// Gives up the remainder of the current time slice while busy-waiting.
    fn yield_now(&self);
}
