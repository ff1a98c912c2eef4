use std::time::{SystemTime, UNIX_EPOCH};

/// We use this under Miri because Miri cannot talk to a real OS but Rust std time still works.
pub(crate) fn read_wall_clock() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since_epoch) => i64::try_from(since_epoch.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => 0_i64.saturating_sub(i64::try_from(e.duration().as_nanos()).unwrap_or(i64::MAX)),
    }
}
