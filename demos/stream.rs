//! Stream samples from one sensor to stdout.
//!
//! Usage: cargo run --example stream [matrix|quaternion|euler] [sensor] [rate_hz]
//! Press Ctrl+C to stop.

use emtracker::{RecordFormat, Sample, Tracker, TrackerConfig};
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let format = match args.next().as_deref() {
        Some("matrix") => RecordFormat::Matrix,
        Some("quaternion") => RecordFormat::Quaternion,
        _ => RecordFormat::Euler,
    };
    let sensor: u16 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let rate: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(80.0);

    let mut tracker = match emtracker::Atc3dg::load() {
        Ok(driver) => Tracker::new(driver),
        Err(e) => {
            eprintln!("Failed to load tracker library: {}", e);
            std::process::exit(1);
        }
    };

    let config = TrackerConfig::new(sensor, format).with_rate(rate);
    if let Err(e) = tracker.initialize(&config) {
        eprintln!("Failed to initialize: {}", e);
        std::process::exit(1);
    }

    println!("Streaming {:?} from sensor {} at {} Hz (Ctrl+C to stop)...", format, sensor, rate);

    match format {
        RecordFormat::Matrix => stream::<_, emtracker::MatrixSample>(&mut tracker, sensor, rate),
        RecordFormat::Quaternion => stream::<_, emtracker::QuaternionSample>(&mut tracker, sensor, rate),
        RecordFormat::Euler => stream::<_, emtracker::EulerSample>(&mut tracker, sensor, rate),
    }

    if let Err(e) = tracker.shutdown() {
        eprintln!("Shutdown failed: {}", e);
    }
}

fn stream<D: emtracker::Driver, S: Sample>(tracker: &mut Tracker<D>, sensor: u16, rate: f64) {
    // records are buffered by the driver; poll roughly once per measurement
    let period = Duration::from_secs_f64(1.0 / rate);
    let start = Instant::now();
    let mut count: u64 = 0;
    let mut invalid: u64 = 0;
    let mut last_report = Instant::now();
    let mut values = vec![0.0; S::LEN];

    loop {
        match tracker.read::<S>(sensor) {
            Ok(reading) => match reading.sample {
                Some(sample) => {
                    count += 1;
                    sample.copy_into(&mut values);
                    // Print every ~20th sample to avoid flooding the terminal
                    if count % 20 == 1 {
                        let line: Vec<String> = values.iter().map(|v| format!("{:+9.3}", v)).collect();
                        println!("{}", line.join(" "));
                    }
                }
                None => {
                    invalid += 1;
                    if invalid % 100 == 1 {
                        eprintln!("Sensor status: {:?}", reading.status);
                    }
                }
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }

        let now = Instant::now();
        if now.duration_since(last_report) >= Duration::from_secs(3) {
            let elapsed = start.elapsed().as_secs_f64();
            println!(
                "--- {} valid / {} invalid in {:.1}s ({:.1} Hz) ---",
                count,
                invalid,
                elapsed,
                count as f64 / elapsed
            );
            last_report = now;
        }

        std::thread::sleep(period);
    }
}
