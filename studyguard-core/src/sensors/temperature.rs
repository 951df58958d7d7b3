//! DS18B20 temperature reader
//!
//! The Linux `w1-therm` driver exposes each probe as a text file:
//!
//! ```text
//! 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//! 72 01 4b 46 7f ff 0e 10 57 t=23125
//! ```
//!
//! The first line ends in `YES` when the scratchpad CRC matched, the second
//! carries the temperature in thousandths of a degree. Every failure - no
//! such device, bad CRC, garbage payload, an impossible value - ends up as an
//! absent reading. The monitor treats absence as "don't know" for one cycle.

use crate::{
    constants::sensors::{DS18B20_MAX_C, DS18B20_MIN_C},
    errors::{SensorError, SensorResult},
};

use super::utils;

/// Parse the contents of a `w1_slave` file into Celsius
pub fn parse_w1_slave(payload: &str) -> SensorResult<f32> {
    let mut lines = payload.lines();

    let status = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(SensorError::Malformed { reason: "empty payload" })?;
    if !status.contains("YES") {
        return Err(SensorError::NotReady { reason: "crc check failed" });
    }

    let data = lines
        .next()
        .ok_or(SensorError::Malformed { reason: "missing data line" })?;
    let (_, milli) = data
        .split_once("t=")
        .ok_or(SensorError::Malformed { reason: "missing t= field" })?;
    let milli: i32 = milli
        .trim()
        .parse()
        .map_err(|_| SensorError::Malformed { reason: "t= is not an integer" })?;

    utils::check_range(milli as f32 / 1000.0, DS18B20_MIN_C, DS18B20_MAX_C)
}

#[cfg(feature = "std")]
pub use self::w1::W1Thermometer;

#[cfg(feature = "std")]
mod w1 {
    use std::path::{Path, PathBuf};

    use super::parse_w1_slave;
    use crate::{
        config::HardwareConfig,
        constants::sensors::W1_DEVICES_ROOT,
        errors::{SensorError, SensorResult},
        traits::TemperatureSensor,
    };

    /// DS18B20 read through the 1-Wire sysfs interface
    #[derive(Debug, Clone)]
    pub struct W1Thermometer {
        path: PathBuf,
    }

    impl W1Thermometer {
        /// Probe `device_id` under `/sys/bus/w1/devices`
        pub fn new(device_id: &str) -> Self {
            Self::with_path(Path::new(W1_DEVICES_ROOT).join(device_id).join("w1_slave"))
        }

        /// Probe the device named in the wiring config
        pub fn from_config(hardware: &HardwareConfig) -> Self {
            Self::new(&hardware.w1_device_id)
        }

        /// Probe an explicit `w1_slave` file
        pub fn with_path(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// File read on every poll
        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Read with the failure reason kept
        pub fn try_read(&self) -> SensorResult<f32> {
            let payload =
                std::fs::read_to_string(&self.path).map_err(|_| SensorError::DeviceMissing)?;
            parse_w1_slave(&payload)
        }
    }

    impl TemperatureSensor for W1Thermometer {
        fn read_celsius(&mut self) -> Option<f32> {
            match self.try_read() {
                Ok(celsius) => Some(celsius),
                Err(e) => {
                    log::debug!("temperature unavailable ({}): {}", self.path.display(), e);
                    None
                }
            }
        }
    }
}
