use std::fmt;

/// Generic failure status returned to C callers for anything that is not a
/// vendor status code.
pub const FAILURE: i32 = -1;

/// Status returned by initialize when no transmitter is attached.
pub const NO_TRANSMITTER: i32 = -2;

/// Errors that can occur when driving the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("{step} failed with driver status {code}")]
    Driver { step: &'static str, code: i32 },

    #[error("Data rate must be > 20 Hz, got {0}")]
    RateTooLow(f64),

    #[error("Unknown record format {0} (expected 0, 1 or 2)")]
    UnknownFormat(i32),

    #[error("Invalid sensor index {0}")]
    InvalidSensor(i32),

    #[error("No attached transmitter found")]
    NoTransmitter,

    #[error("Driver fault: {0}")]
    Fault(String),

    #[error("Failed to load tracker library: {0}")]
    Library(#[from] libloading::Error),

    #[error("Tracker not initialized")]
    NotInitialized,

    #[error("Null sample buffer")]
    NullBuffer,
}

impl TrackerError {
    /// Status code reported across the C boundary.
    pub fn code(&self) -> i32 {
        match self {
            TrackerError::Driver { code, .. } => *code,
            TrackerError::NoTransmitter => NO_TRANSMITTER,
            _ => FAILURE,
        }
    }
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &TrackerError) {
        if let Ok(mut msg) = self.message.lock() {
            // interior NULs would cut the message short for C readers
            let text = err.to_string().replace('\0', " ");
            *msg = fmt::format(format_args!("{}\0", text));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut msg) = self.message.lock() {
            msg.clear();
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_codes() {
        let err = TrackerError::Driver {
            step: "SetSystemParameter(METRIC)",
            code: 0x2003,
        };
        assert_eq!(err.code(), 0x2003);
        assert_eq!(TrackerError::NoTransmitter.code(), NO_TRANSMITTER);
        assert_eq!(TrackerError::RateTooLow(10.0).code(), FAILURE);
        assert_eq!(TrackerError::Fault("boom".into()).code(), FAILURE);
        assert_eq!(TrackerError::NotInitialized.code(), FAILURE);
    }

    #[test]
    fn test_last_error_is_nul_terminated() {
        let last = LastError::new();
        assert!(last.as_ptr().is_null());

        last.set(&TrackerError::RateTooLow(5.0));
        let text = unsafe { CStr::from_ptr(last.as_ptr()) };
        assert_eq!(text.to_str().unwrap(), "Data rate must be > 20 Hz, got 5");

        last.clear();
        assert!(last.as_ptr().is_null());
    }
}
