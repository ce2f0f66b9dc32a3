use crate::sdk::{self, AnglesRecord, PositionRecord, SampleRecord};
use crate::TrackerError;

/// Output encoding requested from the driver for a sensor.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Position plus 3x3 rotation matrix (12 doubles).
    Matrix = 0,
    /// Position plus quaternion (7 doubles).
    Quaternion = 1,
    /// Position plus azimuth/elevation/roll in degrees (6 doubles).
    Euler = 2,
}

impl RecordFormat {
    /// Vendor `DATA_FORMAT_TYPE` value for this format.
    pub fn data_format(self) -> std::ffi::c_int {
        match self {
            RecordFormat::Matrix => sdk::DOUBLE_POSITION_MATRIX,
            RecordFormat::Quaternion => sdk::DOUBLE_POSITION_QUATERNION,
            RecordFormat::Euler => sdk::DOUBLE_POSITION_ANGLES,
        }
    }
}

impl TryFrom<i32> for RecordFormat {
    type Error = TrackerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RecordFormat::Matrix),
            1 => Ok(RecordFormat::Quaternion),
            2 => Ok(RecordFormat::Euler),
            other => Err(TrackerError::UnknownFormat(other)),
        }
    }
}

/// Lowest measurement rate the driver accepts, exclusive.
pub const MIN_RATE_HZ: f64 = 20.0;

/// Setup parameters for [`Tracker::initialize`](crate::Tracker::initialize).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    pub sensor: u16,
    pub format: RecordFormat,
    /// Sensor position offset in millimetres.
    pub offset: [f64; 3],
    /// Angle alignment [azimuth, elevation, roll] in degrees.
    pub angle_align: [f64; 3],
    pub rate_hz: f64,
}

impl TrackerConfig {
    pub fn new(sensor: u16, format: RecordFormat) -> Self {
        Self {
            sensor,
            format,
            offset: [0.0; 3],
            angle_align: [0.0; 3],
            rate_hz: 80.0,
        }
    }

    pub fn with_offset(mut self, offset: [f64; 3]) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_angle_align(mut self, angle_align: [f64; 3]) -> Self {
        self.angle_align = angle_align;
        self
    }

    pub fn with_rate(mut self, rate_hz: f64) -> Self {
        self.rate_hz = rate_hz;
        self
    }

    /// Check the parameters the driver cannot be trusted to reject.
    pub fn validate(&self) -> crate::Result<()> {
        // written so that NaN fails too
        if !(self.rate_hz > MIN_RATE_HZ) {
            return Err(TrackerError::RateTooLow(self.rate_hz));
        }
        Ok(())
    }

    pub(crate) fn offset_record(&self) -> PositionRecord {
        PositionRecord {
            x: self.offset[0],
            y: self.offset[1],
            z: self.offset[2],
        }
    }

    pub(crate) fn angle_record(&self) -> AnglesRecord {
        AnglesRecord {
            a: self.angle_align[0],
            e: self.angle_align[1],
            r: self.angle_align[2],
        }
    }
}

bitflags::bitflags! {
    /// Sensor status word reported by `GetSensorStatus`.
    ///
    /// An empty set is the vendor's `VALID_STATUS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SensorStatus: u32 {
        const GLOBAL_ERROR            = 0x0000_0001;
        const NOT_ATTACHED            = 0x0000_0002;
        const SATURATED               = 0x0000_0004;
        const BAD_EEPROM              = 0x0000_0008;
        const HARDWARE_FAILURE        = 0x0000_0010;
        const NON_EXISTENT            = 0x0000_0020;
        const UNINITIALIZED           = 0x0000_0040;
        const NO_TRANSMITTER_RUNNING  = 0x0000_0080;
        const BAD_12V                 = 0x0000_0100;
        const CPU_TIMEOUT             = 0x0000_0200;
        const INVALID_DEVICE          = 0x0000_0400;
        const NO_TRANSMITTER_ATTACHED = 0x0000_0800;
        const OUT_OF_MOTIONBOX        = 0x0000_1000;
        const ALGORITHM_INITIALIZING  = 0x0000_2000;
    }
}

impl SensorStatus {
    /// Keeps unknown bits so the raw word survives the trip back to C.
    pub fn from_word(word: sdk::DeviceStatusWord) -> Self {
        SensorStatus::from_bits_retain(word as u32)
    }

    pub fn is_valid(self) -> bool {
        self.bits() as sdk::DeviceStatusWord == sdk::VALID_STATUS
    }
}

/// One polled record and the sensor status that came with it.
///
/// `sample` is only present when the status is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading<T> {
    pub status: SensorStatus,
    pub sample: Option<T>,
}

/// A sample that can be requested from the driver and flattened for C callers.
pub trait Sample: Copy + Sized {
    /// Number of doubles written by [`Sample::copy_into`].
    const LEN: usize;

    fn format() -> RecordFormat;

    /// Zeroed record of the matching layout for the driver to fill.
    fn empty_record() -> SampleRecord;

    fn from_record(record: &SampleRecord) -> Option<Self>;

    /// Write the sample into `out[..Self::LEN]`.
    fn copy_into(&self, out: &mut [f64]);
}

/// Position with a row-major 3x3 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixSample {
    pub position: [f64; 3],
    pub rotation: [[f64; 3]; 3],
}

impl Sample for MatrixSample {
    const LEN: usize = 12;

    fn format() -> RecordFormat {
        RecordFormat::Matrix
    }

    fn empty_record() -> SampleRecord {
        SampleRecord::Matrix(Default::default())
    }

    fn from_record(record: &SampleRecord) -> Option<Self> {
        match record {
            SampleRecord::Matrix(r) => Some(MatrixSample {
                position: [r.x, r.y, r.z],
                rotation: r.s,
            }),
            _ => None,
        }
    }

    fn copy_into(&self, out: &mut [f64]) {
        out[..3].copy_from_slice(&self.position);
        for (row, values) in self.rotation.iter().enumerate() {
            out[3 + row * 3..6 + row * 3].copy_from_slice(values);
        }
    }
}

/// Position with a quaternion [q0, q1, q2, q3] as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuaternionSample {
    pub position: [f64; 3],
    pub quaternion: [f64; 4],
}

impl Sample for QuaternionSample {
    const LEN: usize = 7;

    fn format() -> RecordFormat {
        RecordFormat::Quaternion
    }

    fn empty_record() -> SampleRecord {
        SampleRecord::Quaternion(Default::default())
    }

    fn from_record(record: &SampleRecord) -> Option<Self> {
        match record {
            SampleRecord::Quaternion(r) => Some(QuaternionSample {
                position: [r.x, r.y, r.z],
                quaternion: r.q,
            }),
            _ => None,
        }
    }

    fn copy_into(&self, out: &mut [f64]) {
        out[..3].copy_from_slice(&self.position);
        out[3..7].copy_from_slice(&self.quaternion);
    }
}

/// Position with Euler angles [azimuth, elevation, roll] in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerSample {
    pub position: [f64; 3],
    pub angles: [f64; 3],
}

impl Sample for EulerSample {
    const LEN: usize = 6;

    fn format() -> RecordFormat {
        RecordFormat::Euler
    }

    fn empty_record() -> SampleRecord {
        SampleRecord::Angles(Default::default())
    }

    fn from_record(record: &SampleRecord) -> Option<Self> {
        match record {
            SampleRecord::Angles(r) => Some(EulerSample {
                position: [r.x, r.y, r.z],
                angles: [r.a, r.e, r.r],
            }),
            _ => None,
        }
    }

    fn copy_into(&self, out: &mut [f64]) {
        out[..3].copy_from_slice(&self.position);
        out[3..6].copy_from_slice(&self.angles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::PositionMatrixRecord;

    #[test]
    fn test_record_format_from_i32() {
        assert_eq!(RecordFormat::try_from(0).unwrap(), RecordFormat::Matrix);
        assert_eq!(RecordFormat::try_from(1).unwrap(), RecordFormat::Quaternion);
        assert_eq!(RecordFormat::try_from(2).unwrap(), RecordFormat::Euler);
        assert!(matches!(
            RecordFormat::try_from(3),
            Err(TrackerError::UnknownFormat(3))
        ));
    }

    #[test]
    fn test_record_format_maps_to_vendor_format() {
        assert_eq!(RecordFormat::Matrix.data_format(), sdk::DOUBLE_POSITION_MATRIX);
        assert_eq!(RecordFormat::Quaternion.data_format(), sdk::DOUBLE_POSITION_QUATERNION);
        assert_eq!(RecordFormat::Euler.data_format(), sdk::DOUBLE_POSITION_ANGLES);
    }

    #[test]
    fn test_validate_rate() {
        let config = TrackerConfig::new(0, RecordFormat::Euler);
        assert!(config.with_rate(20.5).validate().is_ok());
        assert!(matches!(
            config.with_rate(20.0).validate(),
            Err(TrackerError::RateTooLow(_))
        ));
        assert!(config.with_rate(-1.0).validate().is_err());
        assert!(config.with_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_status_keeps_unknown_bits() {
        let status = SensorStatus::from_word(0x8000_0002);
        assert!(!status.is_valid());
        assert!(status.contains(SensorStatus::NOT_ATTACHED));
        assert_eq!(status.bits(), 0x8000_0002);
        assert!(SensorStatus::from_word(0).is_valid());
    }

    #[test]
    fn test_matrix_sample_flattens_row_major() {
        let record = SampleRecord::Matrix(PositionMatrixRecord {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            s: [[4.0, 5.0, 6.0], [7.0, 8.0, 9.0], [10.0, 11.0, 12.0]],
        });
        let sample = MatrixSample::from_record(&record).unwrap();
        let mut out = [0.0; 12];
        sample.copy_into(&mut out);
        let expected: Vec<f64> = (1..=12).map(f64::from).collect();
        assert_eq!(out.to_vec(), expected);
    }

    #[test]
    fn test_from_record_rejects_other_layout() {
        let record = EulerSample::empty_record();
        assert!(QuaternionSample::from_record(&record).is_none());
        assert!(MatrixSample::from_record(&record).is_none());
        assert!(EulerSample::from_record(&record).is_some());
    }
}
