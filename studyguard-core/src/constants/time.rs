//! Time-Related Constants
//!
//! Periods and durations for the poll loop and the two background threads,
//! all in milliseconds.

// ===== POLL LOOP =====

/// Period of one main loop iteration.
pub const LOOP_PERIOD_MS: u32 = 250;

// ===== INDICATOR =====

/// Red phase of the discomfort blink.
pub const BLINK_ON_MS: u32 = 100;

/// Dark phase of the discomfort blink.
pub const BLINK_OFF_MS: u32 = 100;

/// Flag re-check interval while the indicator shows solid green.
pub const INDICATOR_IDLE_POLL_MS: u32 = 50;

// ===== BUTTON =====

/// Button sampling interval.
pub const BUTTON_POLL_MS: u32 = 30;

/// Hold after a press before edges are detected again.
pub const BUTTON_DEBOUNCE_MS: u32 = 200;

/// Length of the acknowledgment beep.
pub const BUZZER_BEEP_MS: u32 = 80;
