//! Core engine for StudyGuard
//!
//! Turns a photoresistor, a microphone and a DS18B20 probe into a study
//! comfort verdict, and drives an RGB LED, a buzzer and a 16x2 display from
//! it. Designed for a Raspberry Pi with a PCF8591 ADC, but every piece of
//! hardware sits behind a trait.
//!
//! Key constraints:
//! - Signal processing, classification and scoring build without `std`
//! - No heap allocation in the per-poll processing path
//! - A sensor or actuator failure never stops the poll loop
//!
//! ```no_run
//! use studyguard_core::{compute_study_score, DiscomfortClassifier, Thresholds};
//!
//! let mut classifier = DiscomfortClassifier::new(Thresholds::default());
//!
//! // One poll: 22 C, half light, a bit of noise
//! let reasons = classifier.update(Some(22.0), 50, 20);
//! let score = compute_study_score(Some(22.0), 50, 20);
//! assert!(reasons.is_empty());
//! assert_eq!(score.score, 75);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod classifier;
pub mod config;
pub mod constants;
pub mod display;
pub mod errors;
pub mod sampling;
pub mod score;
pub mod sensors;
pub mod traits;

#[cfg(feature = "std")]
pub mod indicator;
#[cfg(feature = "std")]
pub mod monitor;
#[cfg(feature = "std")]
pub mod shared;
#[cfg(feature = "std")]
pub mod station;
#[cfg(feature = "std")]
pub mod telemetry;
#[cfg(feature = "std")]
pub mod toggle;

// Public API
pub use classifier::{DiscomfortClassifier, Reason, Reasons};
pub use config::{MonitorConfig, Thresholds};
pub use display::{DisplayFrame, DisplayMode};
pub use errors::{ActuatorError, ActuatorResult, ConfigError, ConfigResult, SensorError, SensorResult};
pub use score::{compute_study_score, ScoreBreakdown};
pub use traits::{AnalogInput, Buzzer, CharDisplay, DigitalInput, RgbOutput, TemperatureSensor};

#[cfg(feature = "std")]
pub use monitor::{Monitor, PollReport};
#[cfg(feature = "std")]
pub use shared::{SharedHandle, SharedState, StopFlag};
#[cfg(feature = "std")]
pub use station::{ShutdownReport, Station, StationHardware};
#[cfg(feature = "std")]
pub use telemetry::{NoopSink, TelemetryRecord, TelemetrySink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
