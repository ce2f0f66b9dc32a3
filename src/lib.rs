//! # emtracker - Rust binding for the ATC3DG electromagnetic tracker SDK
//!
//! Wraps the vendor 3D Guidance driver (loaded at runtime) behind an owned
//! [`Tracker`] context. Provides:
//! - System setup: metric units, record format, sensor offset, angle
//!   alignment, measurement rate and transmitter selection
//! - Sample polling in matrix, quaternion or Euler form
//! - Vendor error descriptions
//! - C FFI with a generated header for existing capture tools
//!
//! ## Quick Start
//! ```no_run
//! use emtracker::{Atc3dg, RecordFormat, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::new(Atc3dg::load().unwrap());
//! let config = TrackerConfig::new(0, RecordFormat::Euler).with_rate(80.0);
//! tracker.initialize(&config).unwrap();
//!
//! for _ in 0..100 {
//!     let reading = tracker.read_euler(0).unwrap();
//!     if let Some(sample) = reading.sample {
//!         println!("pos: {:?} angles: {:?}", sample.position, sample.angles);
//!     }
//! }
//! tracker.shutdown().unwrap();
//! ```

pub mod error;
pub mod types;
pub mod sdk;
pub mod driver;
pub mod library;
pub mod tracker;
pub mod ffi;

#[cfg(test)]
mod mock;

pub use error::TrackerError;
pub use types::*;
pub use driver::{Driver, MessageType};
pub use library::Atc3dg;
pub use tracker::Tracker;

/// Result type alias for emtracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
