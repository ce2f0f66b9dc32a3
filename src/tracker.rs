use crate::driver::{Driver, MessageType, SensorParameter, SystemParameter};
use crate::sdk::{
    self, SensorConfiguration, SystemConfiguration, TransmitterConfiguration, BIRD_ERROR_SUCCESS,
    ERROR_TEXT_CAPACITY,
};
use crate::types::{
    EulerSample, MatrixSample, QuaternionSample, Reading, Sample, SensorStatus, TrackerConfig,
};
use crate::{Result, TrackerError};
use std::panic::{self, AssertUnwindSafe};

/// Owned context for one tracking system.
///
/// Every operation stops at the first driver call that does not return
/// `BIRD_ERROR_SUCCESS` and reports that call's status.
pub struct Tracker<D: Driver> {
    driver: D,
}

impl<D: Driver> Tracker<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Bring the system up and configure one sensor.
    ///
    /// Units are set to millimetres. The sensor gets the requested record
    /// format, position offset and angle alignment, then the measurement rate
    /// is applied and the lowest-numbered attached transmitter is selected.
    /// Returns the id of that transmitter.
    pub fn initialize(&mut self, config: &TrackerConfig) -> Result<u16> {
        if let Err(e) = config.validate() {
            log::error!("{}", e);
            return Err(e);
        }

        log::info!("Initializing ATC3DG system...");
        check("InitializeBIRDSystem", self.driver.initialize_system())?;

        let system = self.system_configuration()?;

        let mut sensor = SensorConfiguration::default();
        check(
            "GetSensorConfiguration",
            self.driver.sensor_configuration(config.sensor, &mut sensor),
        )?;
        if sensor.attached != 0 {
            log::info!("EM sensor {} is connected", config.sensor);
        } else {
            log::warn!("EM sensor {} not connected", config.sensor);
        }

        self.set_system(SystemParameter::Metric(true))?;
        self.set_sensor(
            config.sensor,
            SensorParameter::DataFormat(config.format.data_format()),
        )?;
        self.set_sensor(config.sensor, SensorParameter::SensorOffset(config.offset_record()))?;
        self.set_sensor(config.sensor, SensorParameter::AngleAlign(config.angle_record()))?;
        self.set_system(SystemParameter::MeasurementRate(config.rate_hz))?;

        self.select_first_transmitter(system.number_transmitters)
    }

    /// Read the system configuration record from the driver.
    pub fn system_configuration(&mut self) -> Result<SystemConfiguration> {
        let mut system = SystemConfiguration::default();
        check(
            "GetBIRDSystemConfiguration",
            self.driver.system_configuration(&mut system),
        )?;
        Ok(system)
    }

    fn select_first_transmitter(&mut self, count: i32) -> Result<u16> {
        for id in 0..count.clamp(0, i16::MAX as i32) as i16 {
            let mut transmitter = TransmitterConfiguration::default();
            check(
                "GetTransmitterConfiguration",
                self.driver.transmitter_configuration(id as u16, &mut transmitter),
            )?;
            if transmitter.attached != 0 {
                self.set_system(SystemParameter::SelectTransmitter(id))?;
                log::info!("Selected transmitter {}", id);
                return Ok(id as u16);
            }
        }

        log::error!("No attached transmitter among {} reported", count);
        Err(TrackerError::NoTransmitter)
    }

    /// Poll the latest buffered record for `sensor`.
    ///
    /// The sample is only filled in when the sensor status is valid. A panic
    /// raised while talking to the driver is reported as
    /// [`TrackerError::Fault`].
    pub fn read<S: Sample>(&mut self, sensor: u16) -> Result<Reading<S>> {
        let driver = &mut self.driver;
        match panic::catch_unwind(AssertUnwindSafe(|| read_record::<D, S>(driver, sensor))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Failed to obtain {:?} sample: {}", S::format(), message);
                Err(TrackerError::Fault(message))
            }
        }
    }

    pub fn read_matrix(&mut self, sensor: u16) -> Result<Reading<MatrixSample>> {
        self.read(sensor)
    }

    pub fn read_quaternion(&mut self, sensor: u16) -> Result<Reading<QuaternionSample>> {
        self.read(sensor)
    }

    pub fn read_euler(&mut self, sensor: u16) -> Result<Reading<EulerSample>> {
        self.read(sensor)
    }

    pub fn sensor_status(&mut self, sensor: u16) -> SensorStatus {
        SensorStatus::from_word(self.driver.sensor_status(sensor))
    }

    /// Deselect the active transmitter.
    pub fn shutdown(&mut self) -> Result<()> {
        self.set_system(SystemParameter::SelectTransmitter(sdk::NO_TRANSMITTER_ID))?;
        log::info!("Transmitter deselected");
        Ok(())
    }

    /// Resolve a driver status code to the vendor's description.
    pub fn describe_error(&mut self, code: i32, kind: MessageType) -> Result<String> {
        let mut buffer = [0u8; ERROR_TEXT_CAPACITY];
        check("GetErrorText", self.driver.error_text(code, &mut buffer, kind))?;
        Ok(extract_string(&buffer))
    }

    fn set_system(&mut self, parameter: SystemParameter) -> Result<()> {
        check(parameter.step(), self.driver.set_system_parameter(parameter))
    }

    fn set_sensor(&mut self, sensor: u16, parameter: SensorParameter) -> Result<()> {
        check(parameter.step(), self.driver.set_sensor_parameter(sensor, parameter))
    }
}

fn read_record<D: Driver, S: Sample>(driver: &mut D, sensor: u16) -> Result<Reading<S>> {
    let mut record = S::empty_record();
    check(
        "GetAsynchronousRecord",
        driver.asynchronous_record(sensor, &mut record),
    )?;

    let status = SensorStatus::from_word(driver.sensor_status(sensor));
    let sample = if status.is_valid() {
        S::from_record(&record)
    } else {
        None
    };

    Ok(Reading { status, sample })
}

fn check(step: &'static str, code: i32) -> Result<()> {
    if code == BIRD_ERROR_SUCCESS {
        Ok(())
    } else {
        log::error!("{} failed (status {})", step, code);
        Err(TrackerError::Driver { step, code })
    }
}

/// Text up to the first NUL, or the whole buffer when the driver left none.
pub(crate) fn extract_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).to_string()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
