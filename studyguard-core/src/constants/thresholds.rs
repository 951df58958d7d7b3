//! Discomfort Thresholds
//!
//! Limits beyond which a study space counts as uncomfortable. A limit has to
//! be exceeded on `NEED_CONSEC` consecutive polls before it is reported.

/// Below this the room is too cold (°C).
pub const TEMP_COLD_C: f32 = 18.0;

/// Above this the room is too hot (°C).
pub const TEMP_HOT_C: f32 = 27.0;

/// Light percentage below which the desk is too dark.
pub const LIGHT_TOO_DARK_PCT: u8 = 15;

/// Light percentage above which there is glare.
pub const LIGHT_TOO_BRIGHT_PCT: u8 = 90;

/// Sound percentage above which the room is too loud.
pub const SOUND_TOO_LOUD_PCT: u8 = 70;

/// Consecutive out-of-range polls before a reason is raised.
///
/// At the default 250 ms period this is one second of sustained discomfort.
pub const NEED_CONSEC: u32 = 4;

// ===== SCORE =====

/// Temperature at which the temperature score peaks (°C).
pub const SCORE_IDEAL_TEMP_C: f64 = 22.0;

/// Score points lost per degree away from the ideal temperature.
pub const SCORE_POINTS_PER_DEGREE: f64 = 8.0;

/// Weight of each score term.
///
/// Three terms at 0.33 sum to 0.99, not 1.0. Kept for parity with deployed
/// stations; a perfect room scores 99.
pub const SCORE_TERM_WEIGHT: f64 = 0.33;

/// Weight of the light and sound terms when the temperature is unknown.
///
/// The temperature term's 0.33 is split evenly, keeping the 0.99 total.
pub const SCORE_TERM_WEIGHT_NO_TEMP: f64 = 0.495;
