//! Monitor configuration
//!
//! One struct per concern, each with a `Default` built from
//! [`crate::constants`]. A deployment can override any subset from JSON:
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use studyguard_core::MonitorConfig;
//!
//! let config = MonitorConfig::from_json_str(r#"{
//!     "light": { "bright_raw": 12, "dark_raw": 180 },
//!     "thresholds": { "need_consec": 8 }
//! }"#)?;
//!
//! assert_eq!(config.light.dark_raw, 180);
//! assert_eq!(config.sound.window_samples, 40); // untouched default
//! # }
//! # Ok::<(), studyguard_core::ConfigError>(())
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{sensors, thresholds, time};
use crate::errors::{ConfigError, ConfigResult};
use crate::traits::RawSample;

/// Complete station configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Photoresistor calibration
    pub light: LightConfig,
    /// Microphone window and baseline filter
    pub sound: SoundConfig,
    /// Discomfort limits
    pub thresholds: Thresholds,
    /// Loop and thread timings
    pub timing: TimingConfig,
    /// Board wiring
    pub hardware: HardwareConfig,
}

/// Photoresistor channel and calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightConfig {
    /// ADC channel
    pub channel: u8,
    /// Raw reading that maps to 100 %
    pub bright_raw: RawSample,
    /// Raw reading that maps to 0 %
    pub dark_raw: RawSample,
    /// Stable samples averaged per reading
    pub samples: u16,
    /// Wait between stable samples (µs)
    pub sample_delay_us: u32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            channel: sensors::LIGHT_CHANNEL,
            bright_raw: sensors::LIGHT_BRIGHT_RAW,
            dark_raw: sensors::LIGHT_DARK_RAW,
            samples: sensors::LIGHT_SAMPLES,
            sample_delay_us: sensors::SAMPLE_DELAY_US,
        }
    }
}

/// Microphone channel and baseline filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoundConfig {
    /// ADC channel
    pub channel: u8,
    /// Samples per peak-to-peak window
    pub window_samples: u16,
    /// Ceiling for peak-to-peak
    pub spike_cap: RawSample,
    /// EMA weight of a new quiet window, in (0, 1]
    pub baseline_alpha: f64,
    /// Peak-to-peak at or below this updates the baseline
    pub quiet_learn_max: RawSample,
    /// Level above baseline reading as 100 %
    pub level_max: RawSample,
    /// Wait between window samples (µs)
    pub sample_delay_us: u32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            channel: sensors::SOUND_CHANNEL,
            window_samples: sensors::SOUND_WINDOW_SAMPLES,
            spike_cap: sensors::SOUND_SPIKE_CAP,
            baseline_alpha: sensors::SOUND_BASELINE_ALPHA,
            quiet_learn_max: sensors::SOUND_QUIET_LEARN_MAX,
            level_max: sensors::SOUND_LEVEL_MAX,
            sample_delay_us: sensors::SAMPLE_DELAY_US,
        }
    }
}

/// Discomfort limits
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Thresholds {
    /// Colder than this (°C) counts as cold
    pub temp_cold_c: f32,
    /// Warmer than this (°C) counts as hot
    pub temp_hot_c: f32,
    /// Light percentage below which the room is dark
    pub light_too_dark: u8,
    /// Light percentage above which the room is too bright
    pub light_too_bright: u8,
    /// Sound percentage above which the room is loud
    pub sound_too_loud: u8,
    /// Consecutive out-of-range polls before a reason is raised
    pub need_consec: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_cold_c: thresholds::TEMP_COLD_C,
            temp_hot_c: thresholds::TEMP_HOT_C,
            light_too_dark: thresholds::LIGHT_TOO_DARK_PCT,
            light_too_bright: thresholds::LIGHT_TOO_BRIGHT_PCT,
            sound_too_loud: thresholds::SOUND_TOO_LOUD_PCT,
            need_consec: thresholds::NEED_CONSEC,
        }
    }
}

/// Loop and thread timings, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// One poll loop iteration
    pub loop_period_ms: u32,
    /// Red phase of the discomfort blink
    pub blink_on_ms: u32,
    /// Dark phase of the discomfort blink
    pub blink_off_ms: u32,
    /// Flag re-check interval while solid green
    pub idle_poll_ms: u32,
    /// Button sampling interval
    pub button_poll_ms: u32,
    /// Hold after a press
    pub debounce_ms: u32,
    /// Acknowledgment beep length
    pub beep_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loop_period_ms: time::LOOP_PERIOD_MS,
            blink_on_ms: time::BLINK_ON_MS,
            blink_off_ms: time::BLINK_OFF_MS,
            idle_poll_ms: time::INDICATOR_IDLE_POLL_MS,
            button_poll_ms: time::BUTTON_POLL_MS,
            debounce_ms: time::BUTTON_DEBOUNCE_MS,
            beep_ms: time::BUZZER_BEEP_MS,
        }
    }
}

#[cfg(feature = "std")]
impl TimingConfig {
    /// Main loop period
    pub fn loop_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.loop_period_ms))
    }
}

/// Which logic level turns an output on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActiveLevel {
    /// Driving the pin high turns it on
    #[default]
    High,
    /// Driving the pin low turns it on
    Low,
}

/// RGB LED wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LedPolarity {
    /// Shared anode: a channel is lit by pulling it low
    #[default]
    CommonAnode,
    /// Shared cathode: a channel is lit by driving it high
    CommonCathode,
}

/// Board wiring details that are not calibration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HardwareConfig {
    /// 1-Wire id of the temperature probe
    pub w1_device_id: heapless::String<32>,
    /// How the RGB LED shares its common pin
    pub led_polarity: LedPolarity,
    /// Level that sounds the buzzer
    pub buzzer_active: ActiveLevel,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        let mut w1_device_id = heapless::String::new();
        // The default id is 15 characters, well inside the capacity
        let _ = w1_device_id.push_str(sensors::DS18B20_DEFAULT_ID);
        Self {
            w1_device_id,
            led_polarity: LedPolarity::CommonAnode,
            buzzer_active: ActiveLevel::High,
        }
    }
}

impl MonitorConfig {
    /// Reject configurations the loops can not run with
    ///
    /// Equal light calibration points are accepted: the normalizer reports
    /// 0 % for them instead of failing.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.light.samples == 0 {
            return Err(ConfigError::invalid("light.samples", "must be at least 1"));
        }
        if self.sound.window_samples == 0 {
            return Err(ConfigError::invalid("sound.window_samples", "must be at least 1"));
        }
        let alpha = self.sound.baseline_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::invalid("sound.baseline_alpha", "must be in (0, 1]"));
        }
        if self.sound.level_max == 0 {
            return Err(ConfigError::invalid("sound.level_max", "must be positive"));
        }
        let t = &self.thresholds;
        if !t.temp_cold_c.is_finite() || !t.temp_hot_c.is_finite() {
            return Err(ConfigError::invalid("thresholds.temp", "must be finite"));
        }
        if t.temp_cold_c >= t.temp_hot_c {
            return Err(ConfigError::invalid("thresholds.temp_cold_c", "must be below temp_hot_c"));
        }
        if t.light_too_dark >= t.light_too_bright {
            return Err(ConfigError::invalid("thresholds.light_too_dark", "must be below light_too_bright"));
        }
        if t.need_consec == 0 {
            return Err(ConfigError::invalid("thresholds.need_consec", "must be at least 1"));
        }
        if self.timing.loop_period_ms == 0 {
            return Err(ConfigError::invalid("timing.loop_period_ms", "must be positive"));
        }
        if self.hardware.w1_device_id.is_empty() {
            return Err(ConfigError::invalid("hardware.w1_device_id", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl MonitorConfig {
    /// Parse and validate a JSON document; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|_| ConfigError::Io)?;
        Self::from_json_str(&json)
    }
}
