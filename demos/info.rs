//! Initialize the tracker and print the system configuration.
//!
//! Usage: cargo run --example info [sensor]

fn main() {
    env_logger::init();

    let sensor: u16 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let mut tracker = match emtracker::Atc3dg::load() {
        Ok(driver) => emtracker::Tracker::new(driver),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = emtracker::TrackerConfig::new(sensor, emtracker::RecordFormat::Euler);
    match tracker.initialize(&config) {
        Ok(transmitter) => println!("Transmitter: {}", transmitter),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let emtracker::TrackerError::Driver { code, .. } = e {
                if let Ok(text) = tracker.describe_error(code, emtracker::MessageType::Verbose) {
                    eprintln!("{}", text);
                }
            }
            std::process::exit(1);
        }
    }

    match tracker.system_configuration() {
        Ok(system) => {
            println!("Boards:       {}", system.number_boards);
            println!("Sensors:      {}", system.number_sensors);
            println!("Transmitters: {}", system.number_transmitters);
            println!("Rate:         {:.1} Hz", system.measurement_rate);
            println!("Max range:    {:.1}", system.maximum_range);
            println!("Metric:       {}", system.metric != 0);
        }
        Err(e) => eprintln!("Error: {}", e),
    }
    println!("Status:       {:?}", tracker.sensor_status(sensor));

    if let Err(e) = tracker.shutdown() {
        eprintln!("Shutdown failed: {}", e);
    }
}
