//! Prints timestamps from the cycle counter clock next to the wall clock, once per second.
//!
//! Run it pinned to different processors at nearly the same time with the same frequency
//! argument and compare the `a2b`/`b2c` columns. If they differ widely between processors, the
//! cycle counters of this machine are not synchronized and timestamps must not be compared
//! across threads. If they drift steadily over time, the frequency argument is not precise
//! enough.
//!
//! Set `RUST_LOG=tscns=trace` to see calibration events.

use std::hint::black_box;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use argh::FromArgs;
use tracing_subscriber::EnvFilter;
use tscns::{Calibrator, Clock};

/// Calls used to measure the latency of `rdns()` at startup.
const LATENCY_CALLS: i64 = 1_000;

/// Compares timestamps from the cycle counter clock with the operating system wall clock.
#[derive(FromArgs)]
struct Args {
    /// known cycle counter frequency in GHz; measured at startup if omitted
    #[argh(positional)]
    ghz: Option<f64>,

    /// number of comparisons to print before exiting; runs until interrupted if omitted
    #[argh(option)]
    count: Option<u64>,

    /// also check whether the cycle counters of all processors are synchronized
    #[argh(switch)]
    verify_sync: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Args = argh::from_env();

    let calibrator = match args.ghz {
        Some(ghz) if !(ghz.is_finite() && ghz > 0.0) => {
            eprintln!("frequency must be a positive number of GHz, got {ghz}");
            return ExitCode::FAILURE;
        }
        Some(ghz) => Calibrator::builder()
            .known_frequency_ghz(ghz)
            .calibration_interval(Duration::from_secs(1))
            .build(),
        None => {
            let mut calibrator = Calibrator::builder()
                .calibration_interval(Duration::from_secs(1))
                .build();

            // The estimate gets more precise if we give it a while before calibrating.
            thread::sleep(Duration::from_secs(1));
            calibrator.calibrate();

            calibrator
        }
    };

    println!("ghz: {:.17}", calibrator.ghz());

    if args.verify_sync {
        match tscns::verify_processor_sync(calibrator.clock(), Duration::from_micros(10)) {
            Ok(report) => println!(
                "cycle counters of {} processors agree within {} ns",
                report.offsets().len(),
                report.max_skew_ns()
            ),
            Err(error) => {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let rdns_latency = rdns_latency_ns(calibrator.clock());
    println!("rdns_latency: {rdns_latency}");

    println!("a:\ttimestamp from rdns()");
    println!("b:\ttimestamp from wall_ns_now()");
    println!("c:\ttimestamp from rdns()");
    println!("good:\twhether b-a and c-b are both non-negative");
    println!("rdns_latency:\ttime rdns() takes in ns");
    println!("rdsysns_latency:\tc-a-rdns_latency");

    run(calibrator, rdns_latency, args.count);

    ExitCode::SUCCESS
}

/// Average time one `rdns()` call takes, measured with the clock itself.
fn rdns_latency_ns(clock: &Clock) -> i64 {
    let before = clock.rdns();

    for _ in 0..LATENCY_CALLS - 1 {
        black_box(clock.rdns());
    }

    let after = clock.rdns();

    (after - before) / LATENCY_CALLS
}

fn run(mut calibrator: Calibrator, rdns_latency: i64, count: Option<u64>) {
    let clock = calibrator.clock().clone();
    let mut remaining = count;

    while remaining != Some(0) {
        let a = clock.rdns();
        let b = tscns::wall_ns_now();
        let c = clock.rdns();

        let a2b = b - a;
        let b2c = c - b;
        let good = a2b >= 0 && b2c >= 0;
        let rdsysns_latency = c - a - rdns_latency;

        println!(
            "a: {a}, b: {b}, c: {c}, a2b: {a2b}, b2c: {b2c}, good: {good}, \
             rdsysns_latency: {rdsysns_latency}"
        );

        remaining = remaining.map(|n| n - 1);

        calibrator.calibrate();
        thread::sleep(Duration::from_secs(1));
    }
}
