//! [`Driver`] backed by the vendor ATC3DG shared library.
//!
//! The library is loaded at runtime so the crate builds on hosts without the
//! 3D Guidance SDK installed. `EMTRACKER_SDK_PATH` overrides the default
//! library name.

use crate::driver::{Driver, MessageType, SensorParameter, SystemParameter};
use crate::sdk::{
    self, Bool, DeviceStatusWord, SampleRecord, SensorConfiguration, SystemConfiguration,
    TransmitterConfiguration,
};
use crate::Result;
use libloading::Library;
use std::ffi::{c_char, c_int, c_ushort, c_void, OsStr};
use std::mem::size_of;

/// Environment variable naming the vendor library to load.
pub const SDK_PATH_ENV: &str = "EMTRACKER_SDK_PATH";

#[cfg(all(windows, target_pointer_width = "64"))]
pub const DEFAULT_LIBRARY: &str = "ATC3DG64.DLL";
#[cfg(all(windows, not(target_pointer_width = "64")))]
pub const DEFAULT_LIBRARY: &str = "ATC3DG.DLL";
#[cfg(not(windows))]
pub const DEFAULT_LIBRARY: &str = "libATC3DGlib64.so";

// ATC3DG entry points
type InitializeBirdSystemFn = unsafe extern "C" fn() -> c_int;
type GetBirdSystemConfigurationFn = unsafe extern "C" fn(*mut SystemConfiguration) -> c_int;
type GetSensorConfigurationFn = unsafe extern "C" fn(c_ushort, *mut SensorConfiguration) -> c_int;
type GetTransmitterConfigurationFn =
    unsafe extern "C" fn(c_ushort, *mut TransmitterConfiguration) -> c_int;
type SetSystemParameterFn = unsafe extern "C" fn(c_int, *mut c_void, c_int) -> c_int;
type SetSensorParameterFn = unsafe extern "C" fn(c_ushort, c_int, *mut c_void, c_int) -> c_int;
type GetAsynchronousRecordFn = unsafe extern "C" fn(c_ushort, *mut c_void, c_int) -> c_int;
type GetSensorStatusFn = unsafe extern "C" fn(c_ushort) -> DeviceStatusWord;
type GetErrorTextFn = unsafe extern "C" fn(c_int, *mut c_char, c_int, c_int) -> c_int;

/// Loaded ATC3DG library with its resolved entry points.
pub struct Atc3dg {
    // Function pointers below are only valid while this is alive.
    _lib: Library,
    initialize_bird_system: InitializeBirdSystemFn,
    get_bird_system_configuration: GetBirdSystemConfigurationFn,
    get_sensor_configuration: GetSensorConfigurationFn,
    get_transmitter_configuration: GetTransmitterConfigurationFn,
    set_system_parameter: SetSystemParameterFn,
    set_sensor_parameter: SetSensorParameterFn,
    get_asynchronous_record: GetAsynchronousRecordFn,
    get_sensor_status: GetSensorStatusFn,
    get_error_text: GetErrorTextFn,
}

impl Atc3dg {
    /// Load the library named by `EMTRACKER_SDK_PATH`, or the platform default.
    pub fn load() -> Result<Atc3dg> {
        let path = read_env_string(SDK_PATH_ENV, DEFAULT_LIBRARY);
        Self::open(&path)
    }

    /// Load the vendor library from `path` and resolve every entry point.
    pub fn open<P: AsRef<OsStr>>(path: P) -> Result<Atc3dg> {
        let path = path.as_ref();
        log::info!("Loading tracker library {:?}", path);

        // SAFETY: loading runs the library's initializers; the symbol types
        // below follow the declarations in ATC3DG.h.
        unsafe {
            let lib = Library::new(path)?;
            let initialize_bird_system =
                *lib.get::<InitializeBirdSystemFn>(b"InitializeBIRDSystem\0")?;
            let get_bird_system_configuration =
                *lib.get::<GetBirdSystemConfigurationFn>(b"GetBIRDSystemConfiguration\0")?;
            let get_sensor_configuration =
                *lib.get::<GetSensorConfigurationFn>(b"GetSensorConfiguration\0")?;
            let get_transmitter_configuration =
                *lib.get::<GetTransmitterConfigurationFn>(b"GetTransmitterConfiguration\0")?;
            let set_system_parameter = *lib.get::<SetSystemParameterFn>(b"SetSystemParameter\0")?;
            let set_sensor_parameter = *lib.get::<SetSensorParameterFn>(b"SetSensorParameter\0")?;
            let get_asynchronous_record =
                *lib.get::<GetAsynchronousRecordFn>(b"GetAsynchronousRecord\0")?;
            let get_sensor_status = *lib.get::<GetSensorStatusFn>(b"GetSensorStatus\0")?;
            let get_error_text = *lib.get::<GetErrorTextFn>(b"GetErrorText\0")?;

            Ok(Atc3dg {
                _lib: lib,
                initialize_bird_system,
                get_bird_system_configuration,
                get_sensor_configuration,
                get_transmitter_configuration,
                set_system_parameter,
                set_sensor_parameter,
                get_asynchronous_record,
                get_sensor_status,
                get_error_text,
            })
        }
    }
}

impl Driver for Atc3dg {
    fn initialize_system(&mut self) -> i32 {
        unsafe { (self.initialize_bird_system)() }
    }

    fn system_configuration(&mut self, config: &mut SystemConfiguration) -> i32 {
        unsafe { (self.get_bird_system_configuration)(config) }
    }

    fn sensor_configuration(&mut self, sensor: u16, config: &mut SensorConfiguration) -> i32 {
        unsafe { (self.get_sensor_configuration)(sensor, config) }
    }

    fn transmitter_configuration(
        &mut self,
        transmitter: u16,
        config: &mut TransmitterConfiguration,
    ) -> i32 {
        unsafe { (self.get_transmitter_configuration)(transmitter, config) }
    }

    fn set_system_parameter(&mut self, parameter: SystemParameter) -> i32 {
        match parameter {
            SystemParameter::SelectTransmitter(id) => {
                let mut value: i16 = id;
                unsafe { self.call_system(sdk::SELECT_TRANSMITTER, &mut value) }
            }
            SystemParameter::Metric(metric) => {
                let mut value: Bool = metric as Bool;
                unsafe { self.call_system(sdk::METRIC, &mut value) }
            }
            SystemParameter::MeasurementRate(rate) => {
                let mut value: f64 = rate;
                unsafe { self.call_system(sdk::MEASUREMENT_RATE, &mut value) }
            }
        }
    }

    fn set_sensor_parameter(&mut self, sensor: u16, parameter: SensorParameter) -> i32 {
        match parameter {
            SensorParameter::DataFormat(format) => {
                let mut value: c_int = format;
                unsafe { self.call_sensor(sensor, sdk::DATA_FORMAT, &mut value) }
            }
            SensorParameter::SensorOffset(mut record) => unsafe {
                self.call_sensor(sensor, sdk::SENSOR_OFFSET, &mut record)
            },
            SensorParameter::AngleAlign(mut record) => unsafe {
                self.call_sensor(sensor, sdk::ANGLE_ALIGN, &mut record)
            },
        }
    }

    fn asynchronous_record(&mut self, sensor: u16, record: &mut SampleRecord) -> i32 {
        let size = record.size() as c_int;
        unsafe { (self.get_asynchronous_record)(sensor, record.as_mut_ptr(), size) }
    }

    fn sensor_status(&mut self, sensor: u16) -> DeviceStatusWord {
        unsafe { (self.get_sensor_status)(sensor) }
    }

    fn error_text(&mut self, code: i32, buffer: &mut [u8], kind: MessageType) -> i32 {
        let kind = match kind {
            MessageType::Simple => sdk::SIMPLE_MESSAGE,
            MessageType::Verbose => sdk::VERBOSE_MESSAGE,
        };
        unsafe {
            (self.get_error_text)(
                code,
                buffer.as_mut_ptr() as *mut c_char,
                buffer.len() as c_int,
                kind,
            )
        }
    }
}

impl Atc3dg {
    /// Pass `value` by pointer and size, as every `SetSystemParameter` caller must.
    unsafe fn call_system<T>(&mut self, parameter: c_int, value: &mut T) -> i32 {
        (self.set_system_parameter)(
            parameter,
            value as *mut T as *mut c_void,
            size_of::<T>() as c_int,
        )
    }

    unsafe fn call_sensor<T>(&mut self, sensor: u16, parameter: c_int, value: &mut T) -> i32 {
        (self.set_sensor_parameter)(
            sensor,
            parameter,
            value as *mut T as *mut c_void,
            size_of::<T>() as c_int,
        )
    }
}

fn read_env_string(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
