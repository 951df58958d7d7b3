//! Discomfort classifier
//!
//! A hysteresis state machine over five consecutive-hit counters. A reason
//! is only reported after its condition has held for `need_consec` polls in
//! a row, and a single in-range poll clears it again:
//!
//! ```text
//! light %   10  10  10  10  10  40  10
//! dark_n     1   2   3   4   5   0   1
//! reason     -   -   -  dark dark -   -      (need_consec = 4)
//! ```
//!
//! Counters reset to zero, they never decay. There is no terminal state; the
//! classifier runs for as long as the monitor does.
//!
//! Cold and hot share one reset rule: a cold poll clears the hot counter and
//! vice versa, an in-range or unknown temperature clears both.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;

/// One discomfort cause
///
/// Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Reason {
    /// Below `temp_cold_c`
    Cold,
    /// Above `temp_hot_c`
    Hot,
    /// Light under `light_too_dark`
    Dark,
    /// Light over `light_too_bright`
    Bright,
    /// Sound over `sound_too_loud`
    Loud,
}

impl Reason {
    /// Every reason, in reporting order
    pub const ALL: [Reason; 5] = [Reason::Cold, Reason::Hot, Reason::Dark, Reason::Bright, Reason::Loud];

    /// Stable tag used on the console, the display and in telemetry
    pub const fn as_str(self) -> &'static str {
        match self {
            Reason::Cold => "cold",
            Reason::Hot => "hot",
            Reason::Dark => "dark",
            Reason::Bright => "bright",
            Reason::Loud => "loud",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons raised in one poll, in fixed order
pub type Reasons = heapless::Vec<Reason, 5>;

/// Consecutive out-of-range poll counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsecutiveCounters {
    /// Polls in a row below the cold limit
    pub cold: u32,
    /// Polls in a row above the hot limit
    pub hot: u32,
    /// Polls in a row too dark
    pub dark: u32,
    /// Polls in a row too bright
    pub bright: u32,
    /// Polls in a row too loud
    pub loud: u32,
}

impl ConsecutiveCounters {
    fn get(&self, reason: Reason) -> u32 {
        match reason {
            Reason::Cold => self.cold,
            Reason::Hot => self.hot,
            Reason::Dark => self.dark,
            Reason::Bright => self.bright,
            Reason::Loud => self.loud,
        }
    }
}

/// Turns per-poll readings into stable discomfort reasons
#[derive(Debug, Clone)]
pub struct DiscomfortClassifier {
    thresholds: Thresholds,
    counters: ConsecutiveCounters,
}

impl Default for DiscomfortClassifier {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl DiscomfortClassifier {
    /// Classifier with every streak at zero
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds, counters: ConsecutiveCounters::default() }
    }

    /// Current streak lengths
    pub fn counters(&self) -> &ConsecutiveCounters {
        &self.counters
    }

    /// Limits this classifier compares against
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Back to the startup state
    pub fn reset(&mut self) {
        self.counters = ConsecutiveCounters::default();
    }

    /// Advance one poll and return the reasons that are now established
    pub fn update(&mut self, temp_c: Option<f32>, light_pct: u8, sound_pct: u8) -> Reasons {
        let t = self.thresholds;
        let c = &mut self.counters;

        match temp_c {
            Some(temp) if temp < t.temp_cold_c => {
                c.cold = c.cold.saturating_add(1);
                c.hot = 0;
            }
            Some(temp) if temp > t.temp_hot_c => {
                c.hot = c.hot.saturating_add(1);
                c.cold = 0;
            }
            // In range, unknown, or NaN
            _ => {
                c.cold = 0;
                c.hot = 0;
            }
        }

        c.dark = bump_if(c.dark, light_pct < t.light_too_dark);
        c.bright = bump_if(c.bright, light_pct > t.light_too_bright);
        c.loud = bump_if(c.loud, sound_pct > t.sound_too_loud);

        self.reasons()
    }

    /// Reasons established by the current counters
    pub fn reasons(&self) -> Reasons {
        let mut reasons = Reasons::new();
        for reason in Reason::ALL {
            if self.counters.get(reason) >= self.thresholds.need_consec {
                // Capacity equals the number of variants
                let _ = reasons.push(reason);
            }
        }
        reasons
    }
}

fn bump_if(counter: u32, condition: bool) -> u32 {
    if condition {
        counter.saturating_add(1)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMFY: (Option<f32>, u8, u8) = (Some(22.0), 50, 20);

    fn run(classifier: &mut DiscomfortClassifier, polls: usize, input: (Option<f32>, u8, u8)) -> Reasons {
        let mut last = Reasons::new();
        for _ in 0..polls {
            last = classifier.update(input.0, input.1, input.2);
        }
        last
    }

    #[test]
    fn dark_appears_on_fourth_poll() {
        let mut classifier = DiscomfortClassifier::default();
        for poll in 1..=3 {
            let reasons = classifier.update(Some(22.0), 10, 20);
            assert!(reasons.is_empty(), "poll {} flagged early", poll);
        }
        let reasons = classifier.update(Some(22.0), 10, 20);
        assert_eq!(reasons.as_slice(), &[Reason::Dark]);
    }

    #[test]
    fn single_in_range_poll_clears() {
        let mut classifier = DiscomfortClassifier::default();
        run(&mut classifier, 10, (Some(22.0), 50, 95));
        assert_eq!(classifier.counters().loud, 10);

        let reasons = classifier.update(Some(22.0), 50, 20);
        assert!(reasons.is_empty());
        assert_eq!(classifier.counters().loud, 0);
    }

    #[test]
    fn absent_temperature_resets_both() {
        let mut classifier = DiscomfortClassifier::default();
        run(&mut classifier, 6, (Some(10.0), 50, 20));
        assert_eq!(classifier.counters().cold, 6);

        let reasons = classifier.update(None, 50, 20);
        assert!(reasons.is_empty());
        assert_eq!(classifier.counters().cold, 0);
        assert_eq!(classifier.counters().hot, 0);
    }

    #[test]
    fn cold_and_hot_exclusive() {
        let mut classifier = DiscomfortClassifier::default();
        run(&mut classifier, 3, (Some(10.0), 50, 20));
        classifier.update(Some(30.0), 50, 20);
        assert_eq!(classifier.counters().cold, 0);
        assert_eq!(classifier.counters().hot, 1);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut classifier = DiscomfortClassifier::default();
        // Exactly at every limit: nothing counts
        run(&mut classifier, 5, (Some(18.0), 15, 70));
        run(&mut classifier, 5, (Some(27.0), 90, 70));
        assert_eq!(*classifier.counters(), ConsecutiveCounters::default());
    }

    #[test]
    fn reasons_in_fixed_order() {
        let mut classifier = DiscomfortClassifier::default();
        // Loud first, then cold and dark join later
        run(&mut classifier, 4, (Some(22.0), 50, 90));
        let reasons = run(&mut classifier, 4, (Some(5.0), 5, 90));
        assert_eq!(reasons.as_slice(), &[Reason::Cold, Reason::Dark, Reason::Loud]);
    }

    #[test]
    fn comfortable_room_never_flags() {
        let mut classifier = DiscomfortClassifier::default();
        assert!(run(&mut classifier, 100, COMFY).is_empty());
    }

    #[test]
    fn nan_temperature_counts_as_unknown() {
        let mut classifier = DiscomfortClassifier::default();
        run(&mut classifier, 2, (Some(35.0), 50, 20));
        classifier.update(Some(f32::NAN), 50, 20);
        assert_eq!(classifier.counters().hot, 0);
    }

    #[test]
    fn reset_returns_to_start() {
        let mut classifier = DiscomfortClassifier::default();
        run(&mut classifier, 8, (Some(35.0), 99, 99));
        classifier.reset();
        assert!(classifier.reasons().is_empty());
        assert_eq!(*classifier.counters(), ConsecutiveCounters::default());
    }

    #[test]
    fn reason_tags() {
        let tags: [&str; 5] = Reason::ALL.map(Reason::as_str);
        assert_eq!(tags, ["cold", "hot", "dark", "bright", "loud"]);
    }
}
