//! Seam between the tracker logic and the vendor entry points.
//!
//! Each method maps one-to-one onto an ATC3DG function and returns the raw
//! vendor status (`BIRD_ERROR_SUCCESS` on success). Interpreting the status is
//! left to [`Tracker`](crate::Tracker).

use crate::sdk::{
    AnglesRecord, DeviceStatusWord, PositionRecord, SampleRecord, SensorConfiguration,
    SystemConfiguration, TransmitterConfiguration,
};
use std::ffi::c_int;

/// Values accepted by `SetSystemParameter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemParameter {
    /// Transmitter to drive; `NO_TRANSMITTER_ID` turns every transmitter off.
    SelectTransmitter(i16),
    /// Report positions in millimetres instead of inches.
    Metric(bool),
    MeasurementRate(f64),
}

impl SystemParameter {
    pub fn name(&self) -> &'static str {
        match self {
            SystemParameter::SelectTransmitter(_) => "SELECT_TRANSMITTER",
            SystemParameter::Metric(_) => "METRIC",
            SystemParameter::MeasurementRate(_) => "MEASUREMENT_RATE",
        }
    }

    /// Call description used in errors and logs.
    pub fn step(&self) -> &'static str {
        match self {
            SystemParameter::SelectTransmitter(_) => "SetSystemParameter(SELECT_TRANSMITTER)",
            SystemParameter::Metric(_) => "SetSystemParameter(METRIC)",
            SystemParameter::MeasurementRate(_) => "SetSystemParameter(MEASUREMENT_RATE)",
        }
    }
}

/// Values accepted by `SetSensorParameter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorParameter {
    /// Vendor `DATA_FORMAT_TYPE`.
    DataFormat(c_int),
    SensorOffset(PositionRecord),
    AngleAlign(AnglesRecord),
}

impl SensorParameter {
    pub fn name(&self) -> &'static str {
        match self {
            SensorParameter::DataFormat(_) => "DATA_FORMAT",
            SensorParameter::SensorOffset(_) => "SENSOR_OFFSET",
            SensorParameter::AngleAlign(_) => "ANGLE_ALIGN",
        }
    }

    pub fn step(&self) -> &'static str {
        match self {
            SensorParameter::DataFormat(_) => "SetSensorParameter(DATA_FORMAT)",
            SensorParameter::SensorOffset(_) => "SetSensorParameter(SENSOR_OFFSET)",
            SensorParameter::AngleAlign(_) => "SetSensorParameter(ANGLE_ALIGN)",
        }
    }
}

/// Text detail requested from `GetErrorText`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Simple,
    Verbose,
}

/// The vendor tracking driver.
pub trait Driver {
    /// `InitializeBIRDSystem`
    fn initialize_system(&mut self) -> i32;

    /// `GetBIRDSystemConfiguration`
    fn system_configuration(&mut self, config: &mut SystemConfiguration) -> i32;

    /// `GetSensorConfiguration`
    fn sensor_configuration(&mut self, sensor: u16, config: &mut SensorConfiguration) -> i32;

    /// `GetTransmitterConfiguration`
    fn transmitter_configuration(
        &mut self,
        transmitter: u16,
        config: &mut TransmitterConfiguration,
    ) -> i32;

    /// `SetSystemParameter`
    fn set_system_parameter(&mut self, parameter: SystemParameter) -> i32;

    /// `SetSensorParameter`
    fn set_sensor_parameter(&mut self, sensor: u16, parameter: SensorParameter) -> i32;

    /// `GetAsynchronousRecord`: fills `record` with the latest buffered sample.
    fn asynchronous_record(&mut self, sensor: u16, record: &mut SampleRecord) -> i32;

    /// `GetSensorStatus`
    fn sensor_status(&mut self, sensor: u16) -> DeviceStatusWord;

    /// `GetErrorText`: writes at most `buffer.len()` bytes of text.
    fn error_text(&mut self, code: i32, buffer: &mut [u8], kind: MessageType) -> i32;
}
