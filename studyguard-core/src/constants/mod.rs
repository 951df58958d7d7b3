//! Constants for StudyGuard Core
//!
//! Every calibration value, threshold and timing constant of a standard
//! deployment lives here. `MonitorConfig::default()` is built from these, so
//! a deployment that never loads a config file runs on exactly these values.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Sensors**: ADC channels, calibration points and sound filter parameters
//! - **Thresholds**: Discomfort limits and the consecutive-hit requirement
//! - **Time**: Loop period, blink cadence and button timing
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Use descriptive names that include units
//! 3. Calibration values belong to a sensor, keep them next to its siblings

/// ADC channels, light calibration and sound filter parameters.
pub mod sensors;

/// Discomfort thresholds and hysteresis depth.
pub mod thresholds;

/// Loop periods, blink cadence and debounce timings.
pub mod time;

pub use sensors::{
    LIGHT_BRIGHT_RAW, LIGHT_DARK_RAW, LIGHT_SAMPLES,
    SOUND_WINDOW_SAMPLES, SOUND_SPIKE_CAP, SOUND_BASELINE_ALPHA,
    SOUND_QUIET_LEARN_MAX, SOUND_LEVEL_MAX,
};

pub use thresholds::{
    TEMP_COLD_C, TEMP_HOT_C, LIGHT_TOO_DARK_PCT, LIGHT_TOO_BRIGHT_PCT,
    SOUND_TOO_LOUD_PCT, NEED_CONSEC,
};

pub use time::{
    LOOP_PERIOD_MS, BLINK_ON_MS, BLINK_OFF_MS, INDICATOR_IDLE_POLL_MS,
    BUTTON_POLL_MS, BUTTON_DEBOUNCE_MS, BUZZER_BEEP_MS,
};
