//! Sensor Normalizers
//!
//! ## Overview
//!
//! Each reader turns one physical sensor into a value the classifier can
//! reason about:
//!
//! | Sensor | Raw | Normalized |
//! |--------|-----|------------|
//! | Photoresistor (ADC ch. 0) | 0..=255, lower is brighter | 0..=100 % |
//! | Microphone (ADC ch. 1) | window of instantaneous samples | 0..=100 % above noise floor |
//! | DS18B20 (1-Wire) | `w1_slave` text | `Option<f32>` °C |
//!
//! ## Failure Model
//!
//! The ADC path has no failure: a read always returns a number. The
//! temperature path can fail in several ways and every one of them becomes
//! `None` at the [`TemperatureSensor`](crate::traits::TemperatureSensor)
//! boundary. A single bad cycle only affects that cycle's classification.
//!
//! ## Usage Example
//!
//! ```rust
//! use studyguard_core::sensors::{LightNormalizer, SoundLevelProcessor};
//!
//! let light = LightNormalizer::default();
//! assert_eq!(light.normalize(80), 50);
//!
//! let mut sound = SoundLevelProcessor::default();
//! let reading = sound.process_window(&[50, 55, 48, 52]);
//! assert_eq!(reading.peak_to_peak, 7);
//! ```

mod light;
mod sound;
mod temperature;
mod utils;

pub use light::{LightNormalizer, LightReading};
pub use sound::{SoundLevelProcessor, SoundReading};
pub use temperature::parse_w1_slave;
#[cfg(feature = "std")]
pub use temperature::W1Thermometer;
pub use utils::{clamp, map_range_to_percent};
