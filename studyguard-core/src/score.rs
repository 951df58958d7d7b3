//! Study score
//!
//! A single 0..=100 number summarizing how good the room is for studying.
//! Each term is itself 0..=100:
//!
//! | Term | Formula |
//! |------|---------|
//! | temperature | `100 - |t - 22| * 8`, clamped |
//! | light | light %, clamped |
//! | sound | `100 - sound %` (quieter is better) |
//!
//! The terms are weighted 0.33 each and the sum truncated. The weights add
//! up to 0.99, so a perfect room scores 99; deployed stations have always
//! reported it that way and the arithmetic is kept bit-for-bit.
//!
//! Without a temperature reading the temperature term is dropped and its
//! weight split over the other two (0.495 each, same 0.99 total), so an
//! unplugged probe does not drag the score down by a third.

use libm::fabs;

use crate::{
    constants::thresholds::{
        SCORE_IDEAL_TEMP_C, SCORE_POINTS_PER_DEGREE, SCORE_TERM_WEIGHT, SCORE_TERM_WEIGHT_NO_TEMP,
    },
    sensors::clamp,
};

/// Score with the terms that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// `None` when the temperature was unknown
    pub temperature_score: Option<f64>,
    /// Light term, the light percentage
    pub light_score: u8,
    /// `100 - sound`
    pub sound_score: u8,
    /// Weighted total, 0 to 100
    pub score: u8,
}

/// Temperature term for a reading in Celsius
pub fn temperature_score(temp_c: f32) -> f64 {
    let distance = fabs(f64::from(temp_c) - SCORE_IDEAL_TEMP_C);
    clamp(100.0 - distance * SCORE_POINTS_PER_DEGREE, 0.0, 100.0)
}

/// Combine normalized readings into the study score
pub fn compute_study_score(temp_c: Option<f32>, light_pct: u8, sound_pct: u8) -> ScoreBreakdown {
    let light_score = clamp(light_pct, 0, 100);
    let sound_score = 100 - clamp(sound_pct, 0, 100);
    let light = f64::from(light_score);
    let sound = f64::from(sound_score);

    // NaN carries no more information than an absent probe
    let temperature_score = temp_c.filter(|t| t.is_finite()).map(temperature_score);

    let raw = match temperature_score {
        Some(temp) => SCORE_TERM_WEIGHT * temp + SCORE_TERM_WEIGHT * light + SCORE_TERM_WEIGHT * sound,
        None => SCORE_TERM_WEIGHT_NO_TEMP * (light + sound),
    };

    ScoreBreakdown {
        temperature_score,
        light_score,
        sound_score,
        score: clamp(raw, 0.0, 100.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_room() {
        let breakdown = compute_study_score(Some(22.0), 50, 20);
        assert_eq!(breakdown.temperature_score, Some(100.0));
        assert_eq!(breakdown.light_score, 50);
        assert_eq!(breakdown.sound_score, 80);
        // 33 + 16.5 + 26.4 = 75.9
        assert_eq!(breakdown.score, 75);
    }

    #[test]
    fn perfect_room_scores_99() {
        assert_eq!(compute_study_score(Some(22.0), 100, 0).score, 99);
        assert_eq!(compute_study_score(None, 100, 0).score, 99);
    }

    #[test]
    fn temperature_term() {
        assert_eq!(temperature_score(22.0), 100.0);
        assert_eq!(temperature_score(24.5), 80.0);
        assert_eq!(temperature_score(19.5), 80.0);
        assert_eq!(temperature_score(40.0), 0.0);
        assert_eq!(temperature_score(-10.0), 0.0);
    }

    #[test]
    fn absent_temperature_reweights() {
        let breakdown = compute_study_score(None, 50, 20);
        assert_eq!(breakdown.temperature_score, None);
        // 0.495 * 50 + 0.495 * 80 = 64.35
        assert_eq!(breakdown.score, 64);
    }

    #[test]
    fn nan_temperature_is_absent() {
        let breakdown = compute_study_score(Some(f32::NAN), 50, 20);
        assert_eq!(breakdown.temperature_score, None);
    }

    #[test]
    fn out_of_range_percentages_clamped() {
        let breakdown = compute_study_score(Some(22.0), 250, 250);
        assert_eq!(breakdown.light_score, 100);
        assert_eq!(breakdown.sound_score, 0);
    }

    proptest! {
        #[test]
        fn score_always_in_range(
            temp in proptest::option::of(-1000.0f32..1000.0),
            light in any::<u8>(),
            sound in any::<u8>(),
        ) {
            let breakdown = compute_study_score(temp, light, sound);
            prop_assert!(breakdown.score <= 100);
            prop_assert!(breakdown.light_score <= 100);
            prop_assert!(breakdown.sound_score <= 100);
            if let Some(t) = breakdown.temperature_score {
                prop_assert!((0.0..=100.0).contains(&t));
            }
        }
    }
}
