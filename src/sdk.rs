//! ATC3DG vendor ABI: parameter identifiers, record layouts and status words.
//!
//! Layouts mirror `ATC3DG.h` from the 3D Guidance SDK. The driver writes into
//! these records directly, so field order and width must not change.

use std::ffi::{c_int, c_ulong, c_ushort};

/// Vendor `BOOL` (a C `int`).
pub type Bool = c_int;

/// Vendor `DEVICE_STATUS` word returned by `GetSensorStatus`.
pub type DeviceStatusWord = c_ulong;

// -- Status --
pub const BIRD_ERROR_SUCCESS: i32 = 0;
pub const VALID_STATUS: DeviceStatusWord = 0;

// -- SYSTEM_PARAMETER_TYPE --
pub const SELECT_TRANSMITTER: c_int = 0;
pub const MEASUREMENT_RATE: c_int = 3;
pub const METRIC: c_int = 5;

// -- SENSOR_PARAMETER_TYPE --
pub const DATA_FORMAT: c_int = 0;
pub const ANGLE_ALIGN: c_int = 1;
pub const SENSOR_OFFSET: c_int = 10;

// -- DATA_FORMAT_TYPE --
pub const DOUBLE_POSITION_ANGLES: c_int = 12;
pub const DOUBLE_POSITION_MATRIX: c_int = 13;
pub const DOUBLE_POSITION_QUATERNION: c_int = 14;

// -- MESSAGE_TYPE --
pub const SIMPLE_MESSAGE: c_int = 0;
pub const VERBOSE_MESSAGE: c_int = 1;

/// Transmitter id that deselects every transmitter.
pub const NO_TRANSMITTER_ID: i16 = -1;

/// Size of the text buffer handed to `GetErrorText`.
pub const ERROR_TEXT_CAPACITY: usize = 1024;

/// `DOUBLE_POSITION_RECORD`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// `DOUBLE_ANGLES_RECORD`: azimuth, elevation, roll in degrees.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnglesRecord {
    pub a: f64,
    pub e: f64,
    pub r: f64,
}

/// `DOUBLE_POSITION_MATRIX_RECORD`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionMatrixRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub s: [[f64; 3]; 3],
}

/// `DOUBLE_POSITION_QUATERNION_RECORD`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionQuaternionRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub q: [f64; 4],
}

/// `DOUBLE_POSITION_ANGLES_RECORD`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionAnglesRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
    pub e: f64,
    pub r: f64,
}

/// `SYSTEM_CONFIGURATION`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemConfiguration {
    pub measurement_rate: f64,
    pub power_line_frequency: f64,
    pub maximum_range: f64,
    pub agc_mode: c_int,
    pub number_boards: c_int,
    pub number_sensors: c_int,
    pub number_transmitters: c_int,
    pub transmitter_id_running: c_int,
    pub metric: Bool,
}

/// `SENSOR_CONFIGURATION`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorConfiguration {
    pub serial_number: c_ulong,
    pub board_number: c_ushort,
    pub channel_number: c_ushort,
    pub data_format: c_int,
    pub attached: Bool,
    pub sensor_type: c_int,
}

/// `TRANSMITTER_CONFIGURATION`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransmitterConfiguration {
    pub serial_number: c_ulong,
    pub board_number: c_ushort,
    pub channel_number: c_ushort,
    pub transmitter_type: c_int,
    pub attached: Bool,
}

/// Output record requested from `GetAsynchronousRecord`.
///
/// The variant picks the layout the driver fills in; it must agree with the
/// sensor's configured `DATA_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleRecord {
    Matrix(PositionMatrixRecord),
    Quaternion(PositionQuaternionRecord),
    Angles(PositionAnglesRecord),
}

impl SampleRecord {
    /// Size in bytes of the record layout, as passed to the driver.
    pub fn size(&self) -> usize {
        match self {
            SampleRecord::Matrix(_) => std::mem::size_of::<PositionMatrixRecord>(),
            SampleRecord::Quaternion(_) => std::mem::size_of::<PositionQuaternionRecord>(),
            SampleRecord::Angles(_) => std::mem::size_of::<PositionAnglesRecord>(),
        }
    }

    /// Pointer to the record storage for the driver to write into.
    pub fn as_mut_ptr(&mut self) -> *mut std::ffi::c_void {
        match self {
            SampleRecord::Matrix(r) => r as *mut _ as *mut std::ffi::c_void,
            SampleRecord::Quaternion(r) => r as *mut _ as *mut std::ffi::c_void,
            SampleRecord::Angles(r) => r as *mut _ as *mut std::ffi::c_void,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_record_sizes_are_packed_doubles() {
        assert_eq!(size_of::<PositionRecord>(), 3 * 8);
        assert_eq!(size_of::<AnglesRecord>(), 3 * 8);
        assert_eq!(size_of::<PositionMatrixRecord>(), 12 * 8);
        assert_eq!(size_of::<PositionQuaternionRecord>(), 7 * 8);
        assert_eq!(size_of::<PositionAnglesRecord>(), 6 * 8);
    }

    #[test]
    fn test_sample_record_size_follows_variant() {
        assert_eq!(SampleRecord::Matrix(Default::default()).size(), 96);
        assert_eq!(SampleRecord::Quaternion(Default::default()).size(), 56);
        assert_eq!(SampleRecord::Angles(Default::default()).size(), 48);
    }

    #[test]
    fn test_system_configuration_layout() {
        // three doubles followed by six ints
        assert_eq!(size_of::<SystemConfiguration>(), 3 * 8 + 6 * 4);
    }
}
