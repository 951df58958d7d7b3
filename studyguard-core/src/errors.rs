//! Error Types for Sensors, Actuators and Configuration
//!
//! ## Design Philosophy
//!
//! StudyGuard runs an endless poll loop. Almost nothing is allowed to be fatal
//! once that loop is running, so the error types here are small, `Copy`, and
//! carry only `&'static str` context. They are cheap to log and cheap to
//! collect during shutdown.
//!
//! ## Error Categories
//!
//! ### Sensor Errors
//! - `DeviceMissing`: the 1-Wire device file could not be opened
//! - `NotReady`: the device reported a failed CRC / readiness flag
//! - `Malformed`: the payload could not be parsed
//! - `OutOfRange`: parsed, but outside what the device can physically report
//!
//! Sensor errors never leave the temperature reader: they collapse into an
//! absent reading (`None`) for that cycle.
//!
//! ### Actuator Errors
//! - `WriteFailed`: a display, LED or buzzer write did not go through
//! - `Unavailable`: the device was already released or never initialized
//!
//! ### Configuration Errors
//! - `InvalidValue`: a field fails validation
//! - `Parse`: the JSON document is malformed
//! - `Io`: the configuration file could not be read
//!
//! ## Handling Strategy
//!
//! ```rust
//! use studyguard_core::{ActuatorError, ActuatorResult};
//!
//! fn refresh(result: ActuatorResult<()>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(ActuatorError::WriteFailed { device, .. }) => {
//!             // Log and keep polling; the next cycle rewrites the device
//!             let _ = device;
//!         }
//!         Err(ActuatorError::Unavailable { .. }) => {}
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for sensor reads that can fail
pub type SensorResult<T> = Result<T, SensorError>;

/// Result type for actuator writes
pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Temperature sensor failures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// Device file missing or unreadable
    #[error("Sensor device missing")]
    DeviceMissing,

    /// Device answered but flagged the reading as invalid
    #[error("Sensor not ready: {reason}")]
    NotReady {
        /// Why the device rejected the reading
        reason: &'static str,
    },

    /// Payload did not have the expected shape
    #[error("Malformed sensor payload: {reason}")]
    Malformed {
        /// What was wrong with the payload
        reason: &'static str,
    },

    /// Parsed value outside the device's physical range
    #[error("Reading {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Parsed reading
        value: f32,
        /// Lowest value the device can report
        min: f32,
        /// Highest value the device can report
        max: f32,
    },
}

/// Display, LED and buzzer failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// A write to the device failed
    #[error("Write to {device} failed: {reason}")]
    WriteFailed {
        /// Which actuator (e.g. "display", "rgb-led")
        device: &'static str,
        /// Driver-level cause
        reason: &'static str,
    },

    /// The device is not available any more
    #[error("{device} unavailable")]
    Unavailable {
        /// Which actuator
        device: &'static str,
    },
}

/// Configuration failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },

    /// JSON syntax or type error
    #[error("Config parse error at line {line}, column {column}")]
    Parse {
        /// 1-based line of the error
        line: usize,
        /// 1-based column of the error
        column: usize,
    },

    /// The file could not be read
    #[error("Config file unreadable")]
    Io,
}

impl ConfigError {
    pub(crate) const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidValue { field, reason }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DeviceMissing =>
                defmt::write!(fmt, "Sensor device missing"),
            Self::NotReady { reason } =>
                defmt::write!(fmt, "Sensor not ready: {}", reason),
            Self::Malformed { reason } =>
                defmt::write!(fmt, "Malformed payload: {}", reason),
            Self::OutOfRange { value, min, max } =>
                defmt::write!(fmt, "Reading {} outside [{}, {}]", value, min, max),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ActuatorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::WriteFailed { device, reason } =>
                defmt::write!(fmt, "Write to {} failed: {}", device, reason),
            Self::Unavailable { device } =>
                defmt::write!(fmt, "{} unavailable", device),
        }
    }
}
