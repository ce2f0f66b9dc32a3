//! Scripted [`Driver`] for tests.

use crate::driver::{Driver, MessageType, SensorParameter, SystemParameter};
use crate::sdk::{
    DeviceStatusWord, PositionAnglesRecord, PositionMatrixRecord, PositionQuaternionRecord,
    SampleRecord, SensorConfiguration, SystemConfiguration, TransmitterConfiguration,
    BIRD_ERROR_SUCCESS,
};

/// A vendor entry point as seen by the mock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    InitializeSystem,
    SystemConfiguration,
    SensorConfiguration(u16),
    TransmitterConfiguration(u16),
    SetSystem(SystemParameter),
    SetSensor(u16, SensorParameter),
    AsynchronousRecord(u16),
    SensorStatus(u16),
    ErrorText(i32, MessageType),
}

/// Which entry point the mock should fail, matched on call kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    InitializeSystem,
    SystemConfiguration,
    SensorConfiguration,
    TransmitterConfiguration,
    SetSystem(&'static str),
    SetSensor(&'static str),
    AsynchronousRecord,
}

pub struct MockDriver {
    pub calls: Vec<Call>,
    pub transmitters: Vec<bool>,
    pub sensor_attached: bool,
    pub status: DeviceStatusWord,
    pub matrix: PositionMatrixRecord,
    pub quaternion: PositionQuaternionRecord,
    pub angles: PositionAnglesRecord,
    pub error_message: Vec<u8>,
    pub panic_on_record: bool,
    failure: Option<(Entry, i32)>,
}

impl MockDriver {
    pub fn new() -> Self {
        MockDriver {
            calls: Vec::new(),
            transmitters: vec![true],
            sensor_attached: true,
            status: 0,
            matrix: PositionMatrixRecord {
                x: 1.0,
                y: 2.0,
                z: 3.0,
                s: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            },
            quaternion: PositionQuaternionRecord {
                x: 1.0,
                y: 2.0,
                z: 3.0,
                q: [1.0, 0.0, 0.0, 0.0],
            },
            angles: PositionAnglesRecord {
                x: 1.0,
                y: 2.0,
                z: 3.0,
                a: 10.0,
                e: 20.0,
                r: 30.0,
            },
            error_message: b"No error".to_vec(),
            panic_on_record: false,
            failure: None,
        }
    }

    pub fn fail(mut self, entry: Entry, code: i32) -> Self {
        self.failure = Some((entry, code));
        self
    }

    fn status_for(&self, entry: Entry) -> i32 {
        match self.failure {
            Some((failing, code)) if failing == entry => code,
            _ => BIRD_ERROR_SUCCESS,
        }
    }

    /// Calls that set the given system parameter, in order.
    pub fn system_sets(&self) -> Vec<SystemParameter> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetSystem(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl Driver for MockDriver {
    fn initialize_system(&mut self) -> i32 {
        self.calls.push(Call::InitializeSystem);
        self.status_for(Entry::InitializeSystem)
    }

    fn system_configuration(&mut self, config: &mut SystemConfiguration) -> i32 {
        self.calls.push(Call::SystemConfiguration);
        config.number_transmitters = self.transmitters.len() as i32;
        config.number_sensors = 4;
        config.number_boards = 1;
        config.measurement_rate = 80.0;
        self.status_for(Entry::SystemConfiguration)
    }

    fn sensor_configuration(&mut self, sensor: u16, config: &mut SensorConfiguration) -> i32 {
        self.calls.push(Call::SensorConfiguration(sensor));
        config.attached = self.sensor_attached as i32;
        config.channel_number = sensor;
        self.status_for(Entry::SensorConfiguration)
    }

    fn transmitter_configuration(
        &mut self,
        transmitter: u16,
        config: &mut TransmitterConfiguration,
    ) -> i32 {
        self.calls.push(Call::TransmitterConfiguration(transmitter));
        let attached = self
            .transmitters
            .get(transmitter as usize)
            .copied()
            .unwrap_or(false);
        config.attached = attached as i32;
        self.status_for(Entry::TransmitterConfiguration)
    }

    fn set_system_parameter(&mut self, parameter: SystemParameter) -> i32 {
        self.calls.push(Call::SetSystem(parameter));
        self.status_for(Entry::SetSystem(parameter.name()))
    }

    fn set_sensor_parameter(&mut self, sensor: u16, parameter: SensorParameter) -> i32 {
        self.calls.push(Call::SetSensor(sensor, parameter));
        self.status_for(Entry::SetSensor(parameter.name()))
    }

    fn asynchronous_record(&mut self, sensor: u16, record: &mut SampleRecord) -> i32 {
        self.calls.push(Call::AsynchronousRecord(sensor));
        if self.panic_on_record {
            panic!("driver fault while reading sensor {}", sensor);
        }
        match record {
            SampleRecord::Matrix(r) => *r = self.matrix,
            SampleRecord::Quaternion(r) => *r = self.quaternion,
            SampleRecord::Angles(r) => *r = self.angles,
        }
        self.status_for(Entry::AsynchronousRecord)
    }

    fn sensor_status(&mut self, sensor: u16) -> DeviceStatusWord {
        self.calls.push(Call::SensorStatus(sensor));
        self.status
    }

    fn error_text(&mut self, code: i32, buffer: &mut [u8], kind: MessageType) -> i32 {
        self.calls.push(Call::ErrorText(code, kind));
        // Like the vendor, fill as much as fits and only terminate when there is room.
        let len = self.error_message.len().min(buffer.len());
        buffer[..len].copy_from_slice(&self.error_message[..len]);
        if len < buffer.len() {
            buffer[len] = 0;
        }
        BIRD_ERROR_SUCCESS
    }
}
