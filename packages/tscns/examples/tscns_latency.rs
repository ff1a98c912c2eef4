//! Measures the average latency of each clock operation over many calls.
//!
//! Latencies are measured in a tight loop, so they are a lower bound of what a real
//! application observes.

use std::hint::black_box;
use std::time::Instant;

use argh::FromArgs;
use tscns::Calibrator;

/// Measures the average latency of cycle counter clock operations.
#[derive(FromArgs)]
struct Args {
    /// number of calls to average over
    #[argh(option, default = "1_000_000")]
    calls: u32,
}

fn main() {
    let args: Args = argh::from_env();

    let mut calibrator = Calibrator::new();
    let clock = calibrator.clock().clone();

    println!("ghz: {:.15}", clock.ghz());

    report("wall_ns_now", args.calls, || {
        black_box(tscns::wall_ns_now());
    });

    report("tick_now", args.calls, || {
        black_box(tscns::tick_now());
    });

    report("rdns", args.calls, || {
        black_box(clock.rdns());
    });

    let tick = tscns::tick_now();
    report("tsc2ns", args.calls, || {
        black_box(clock.tsc2ns(black_box(tick)));
    });

    report("calibrate (not due)", args.calls, || calibrator.calibrate());
}

fn report(name: &str, calls: u32, mut f: impl FnMut()) {
    let start = Instant::now();

    for _ in 0..calls {
        f();
    }

    let per_call = start.elapsed() / calls.max(1);
    println!("{name}: {} ns", per_call.as_nanos());
}
