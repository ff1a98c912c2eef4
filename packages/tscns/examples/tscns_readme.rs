//! Example code for the `README.md` file.
//!
//! This contains the same code that appears in the `tscns` package `README.md`.

fn main() {
    use std::time::Duration;

    use tscns::Calibrator;

    // Measures the cycle counter frequency against the wall clock (takes 20 ms).
    let mut calibrator = Calibrator::builder()
        .calibration_interval(Duration::from_secs(1))
        .build();

    // Clock handles are cheap to clone and can be sent to other threads.
    let clock = calibrator.clock().clone();

    let start = clock.rdns();
    std::thread::sleep(Duration::from_millis(10));
    let end = clock.rdns();

    println!("Slept for {} ns", end - start);

    // Call this periodically, e.g. from a housekeeping thread. It does real work only
    // once per calibration interval and is cheap otherwise.
    calibrator.calibrate();

    println!("Cycle counter frequency: {:.6} GHz", calibrator.ghz());
    println!("Now: {} ns since the Unix epoch", clock.rdns());
}
