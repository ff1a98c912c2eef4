/// No usable cycle counter, so the wall clock itself serves as the counter.
#[inline]
pub(crate) fn read_counter() -> i64 {
    super::read_wall_clock()
}
