//! C FFI layer for emtracker.
//!
//! The exported surface has no handle parameter, so one process-wide
//! [`Tracker`] lives behind a mutex here. The vendor library is loaded on
//! first use and stays loaded. The generated C header is written to
//! `include/emtracker.h` by cbindgen.
//!
//! Every function returns `0` or the vendor status on the driver's terms,
//! `-1` for local failures and `-2` when no transmitter is attached.

use crate::driver::{Driver, MessageType};
use crate::error::{LastError, FAILURE};
use crate::library::Atc3dg;
use crate::tracker::Tracker;
use crate::types::{EulerSample, MatrixSample, QuaternionSample, RecordFormat, Sample, TrackerConfig};
use crate::{Result, TrackerError};
use std::ffi::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};

static LAST_ERROR: LastError = LastError::new();

static TRACKER: Mutex<Option<Tracker<Atc3dg>>> = Mutex::new(None);

fn lock_tracker() -> MutexGuard<'static, Option<Tracker<Atc3dg>>> {
    TRACKER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The process-wide tracker, loading the vendor library on first use.
fn loaded(slot: &mut Option<Tracker<Atc3dg>>) -> Result<&mut Tracker<Atc3dg>> {
    if slot.is_none() {
        *slot = Some(Tracker::new(Atc3dg::load()?));
    }
    slot.as_mut().ok_or(TrackerError::NotInitialized)
}

/// Run `f`, turning its outcome into a C status and recording failures.
/// Panics never cross the C boundary.
fn run(f: impl FnOnce() -> Result<i32>) -> i32 {
    let outcome = panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        Err(TrackerError::Fault("panic in tracker binding".into()))
    });

    match outcome {
        Ok(status) => status,
        Err(e) => {
            LAST_ERROR.set(&e);
            e.code()
        }
    }
}

/// Build a setup request from the raw C arguments.
fn parse_config(
    sensor: i32,
    format: i32,
    offset: [f64; 3],
    angle_align: [f64; 3],
    rate_hz: f64,
) -> Result<TrackerConfig> {
    let config = TrackerConfig::new(sensor_index(sensor)?, RecordFormat::try_from(format)?)
        .with_offset(offset)
        .with_angle_align(angle_align)
        .with_rate(rate_hz);
    config.validate()?;
    Ok(config)
}

fn sensor_index(sensor: i32) -> Result<u16> {
    u16::try_from(sensor).map_err(|_| TrackerError::InvalidSensor(sensor))
}

/// Poll one record and copy it into `out` only when the sensor status is valid.
/// Returns the raw status word.
fn read_into<D: Driver, S: Sample>(
    tracker: &mut Tracker<D>,
    sensor: u16,
    out: &mut [f64],
) -> Result<i32> {
    let reading = tracker.read::<S>(sensor)?;
    if let Some(sample) = reading.sample {
        sample.copy_into(out);
    }
    Ok(reading.status.bits() as i32)
}

unsafe fn read_sample<S: Sample>(sensor: i32, out: *mut f64) -> i32 {
    if out.is_null() {
        LAST_ERROR.set(&TrackerError::NullBuffer);
        return FAILURE;
    }
    let out = std::slice::from_raw_parts_mut(out, S::LEN);

    run(|| {
        let sensor = sensor_index(sensor)?;
        let mut slot = lock_tracker();
        let tracker = slot.as_mut().ok_or(TrackerError::NotInitialized)?;
        read_into::<_, S>(tracker, sensor, out)
    })
}

/// Initialize the tracking system and configure one sensor.
///
/// `format`: 0 = position + matrix, 1 = position + quaternion,
/// 2 = position + Euler angles. Offsets are in millimetres, angles in degrees.
/// `rate_hz` must be above 20.
///
/// Returns 0 once a transmitter is selected, -2 if none is attached, -1 for
/// invalid arguments or a missing vendor library, or the failing vendor
/// status.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn em_initialize(
    sensor: i32,
    format: i32,
    offset_x: f64,
    offset_y: f64,
    offset_z: f64,
    angle_az: f64,
    angle_el: f64,
    angle_roll: f64,
    rate_hz: f64,
) -> i32 {
    LAST_ERROR.clear();
    run(|| {
        let config = parse_config(
            sensor,
            format,
            [offset_x, offset_y, offset_z],
            [angle_az, angle_el, angle_roll],
            rate_hz,
        )?;

        let mut slot = lock_tracker();
        let tracker = loaded(&mut slot)?;
        tracker.initialize(&config)?;
        Ok(0)
    })
}

/// Read a position + matrix sample into `out` (12 doubles: x, y, z, then the
/// row-major 3x3 matrix). `out` is only written when the status is valid.
///
/// Returns the sensor status word (0 = valid), a vendor error status, or -1.
///
/// # Safety
/// `out` must point to at least 12 writable doubles, or be null.
#[no_mangle]
pub unsafe extern "C" fn em_read_matrix_sample(sensor: i32, out: *mut f64) -> i32 {
    read_sample::<MatrixSample>(sensor, out)
}

/// Read a position + quaternion sample into `out` (7 doubles: x, y, z, q0..q3).
///
/// # Safety
/// `out` must point to at least 7 writable doubles, or be null.
#[no_mangle]
pub unsafe extern "C" fn em_read_quaternion_sample(sensor: i32, out: *mut f64) -> i32 {
    read_sample::<QuaternionSample>(sensor, out)
}

/// Read a position + Euler sample into `out` (6 doubles: x, y, z, azimuth,
/// elevation, roll).
///
/// # Safety
/// `out` must point to at least 6 writable doubles, or be null.
#[no_mangle]
pub unsafe extern "C" fn em_read_euler_sample(sensor: i32, out: *mut f64) -> i32 {
    read_sample::<EulerSample>(sensor, out)
}

/// Deselect the active transmitter. Returns 0 or the vendor status.
#[no_mangle]
pub extern "C" fn em_shutdown() -> i32 {
    run(|| {
        let mut slot = lock_tracker();
        let tracker = slot.as_mut().ok_or(TrackerError::NotInitialized)?;
        tracker.shutdown()?;
        Ok(0)
    })
}

/// Print the vendor description of `code` to stdout.
#[no_mangle]
pub extern "C" fn em_describe_error(code: i32) {
    run(|| {
        let mut slot = lock_tracker();
        let tracker = loaded(&mut slot)?;
        let text = tracker.describe_error(code, MessageType::Simple)?;
        println!("{}", text);
        Ok(0)
    });
}

/// Get the last error message. Returns NULL if no error.
/// The returned pointer is valid until the next emtracker call.
#[no_mangle]
pub extern "C" fn em_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
