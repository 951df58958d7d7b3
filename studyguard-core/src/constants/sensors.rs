//! Sensor Channels and Calibration
//!
//! Values for a PCF8591 8-bit ADC with a photoresistor on channel 0 and an
//! analog microphone module on channel 1, plus a DS18B20 on the 1-Wire bus.

// ===== ADC =====

/// Highest raw value of the 8-bit converter.
pub const ADC_MAX_RAW: u16 = 255;

/// ADC channel wired to the photoresistor divider.
pub const LIGHT_CHANNEL: u8 = 0;

/// ADC channel wired to the microphone module.
pub const SOUND_CHANNEL: u8 = 1;

/// Delay between two stable samples (microseconds).
///
/// Gives the converter time to settle after the multiplexer switches.
pub const SAMPLE_DELAY_US: u32 = 800;

// ===== LIGHT =====

/// Raw reading under a desk lamp at full brightness.
///
/// The photoresistor divider reads lower as light increases.
pub const LIGHT_BRIGHT_RAW: u16 = 20;

/// Raw reading with the room lights off.
pub const LIGHT_DARK_RAW: u16 = 140;

/// Stable samples averaged for one light reading.
pub const LIGHT_SAMPLES: u16 = 8;

// ===== SOUND =====

/// Instantaneous samples in one sound window.
pub const SOUND_WINDOW_SAMPLES: u16 = 40;

/// Ceiling applied to the window's peak-to-peak value.
///
/// A single outlier can not push the level past this.
pub const SOUND_SPIKE_CAP: u16 = 180;

/// Weight of the newest quiet window in the baseline average.
pub const SOUND_BASELINE_ALPHA: f64 = 0.05;

/// Largest peak-to-peak value that still teaches the baseline.
///
/// Louder windows are measured against the baseline but never move it.
pub const SOUND_QUIET_LEARN_MAX: u16 = 90;

/// Level above baseline that reads as 100 %.
pub const SOUND_LEVEL_MAX: u16 = 80;

// ===== TEMPERATURE =====

/// 1-Wire id of the DS18B20 shipped with the station.
pub const DS18B20_DEFAULT_ID: &str = "28-012037a4749a";

/// Sysfs root of the Linux 1-Wire bus.
pub const W1_DEVICES_ROOT: &str = "/sys/bus/w1/devices";

/// Lowest temperature the DS18B20 reports (°C).
///
/// Source: Maxim DS18B20 datasheet
pub const DS18B20_MIN_C: f32 = -55.0;

/// Highest temperature the DS18B20 reports (°C).
///
/// Source: Maxim DS18B20 datasheet
pub const DS18B20_MAX_C: f32 = 125.0;
