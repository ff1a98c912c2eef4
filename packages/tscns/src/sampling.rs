use crate::pal::Platform;

/// How many wall clock reads we bracket with counter reads when taking one sample.
const BRACKET_COUNT: usize = 3;

/// A wall clock read bracketed by two counter reads.
#[derive(Clone, Copy, Debug)]
struct Bracket {
    tick_before: i64,
    wall_ns: i64,
    tick_after: i64,
}

impl Bracket {
    fn take(pal: &impl Platform, tick_before: i64) -> Self {
        let wall_ns = pal.wall_ns_now();
        let tick_after = pal.tick_now();

        Self {
            tick_before,
            wall_ns,
            tick_after,
        }
    }

    fn width(&self) -> i64 {
        self.tick_after.wrapping_sub(self.tick_before)
    }

    fn midpoint_tick(&self) -> i64 {
        self.tick_before.wrapping_add(self.width() >> 1)
    }
}

/// Takes a `(tick, wall_ns)` pair with minimal skew between the two readings.
///
/// A wall clock read is slow and its latency jitters, so pairing it with a single counter read
/// would attribute the wall clock value to the wrong tick by an unpredictable amount. Instead we
/// interleave several wall clock reads with counter reads, keep the wall clock read with the
/// tightest bracket around it (first one wins ties) and attribute it to the midpoint of that
/// bracket.
pub(crate) fn sync_time(pal: &impl Platform) -> (i64, i64) {
    let mut best = Bracket::take(pal, pal.tick_now());
    let mut previous_tick = best.tick_after;

    for _ in 1..BRACKET_COUNT {
        let bracket = Bracket::take(pal, previous_tick);
        previous_tick = bracket.tick_after;

        if bracket.width() < best.width() {
            best = bracket;
        }
    }

    (best.midpoint_tick(), best.wall_ns)
}
