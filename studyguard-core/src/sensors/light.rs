//! Light normalizer
//!
//! The photoresistor sits in a divider that reads *lower* as the room gets
//! brighter. Readings are inverted against the dark calibration point and
//! rescaled so that:
//! - the bright point maps to 100 %
//! - the dark point maps to 0 %
//! - anything beyond either point is clamped

use embedded_hal::delay::DelayNs;

use crate::{
    config::LightConfig,
    sampling::read_stable,
    traits::{AnalogInput, RawSample},
};

use super::utils;

/// One light measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightReading {
    /// Averaged raw ADC value
    pub raw: RawSample,
    /// Normalized brightness, 0..=100
    pub percent: u8,
}

/// Maps raw photoresistor readings to a brightness percentage
#[derive(Debug, Clone)]
pub struct LightNormalizer {
    config: LightConfig,
}

impl Default for LightNormalizer {
    fn default() -> Self {
        Self::new(LightConfig::default())
    }
}

impl LightNormalizer {
    /// Normalizer for the given calibration
    pub fn new(config: LightConfig) -> Self {
        if config.bright_raw >= config.dark_raw {
            log_warn!(
                "light calibration inverted or flat (bright {} >= dark {})",
                config.bright_raw,
                config.dark_raw
            );
        }
        Self { config }
    }

    /// Brightness percentage for a raw reading
    ///
    /// Returns 0 when the bright and dark calibration points are equal.
    pub fn normalize(&self, raw: RawSample) -> u8 {
        let dark = i32::from(self.config.dark_raw);
        let bright = i32::from(self.config.bright_raw);
        utils::map_range_to_percent(dark - i32::from(raw), 0, dark - bright)
    }

    /// Take a stable reading from the configured channel and normalize it
    pub fn read<A, D>(&self, adc: &mut A, delay: &mut D) -> LightReading
    where
        A: AnalogInput + ?Sized,
        D: DelayNs + ?Sized,
    {
        let raw = read_stable(
            adc,
            delay,
            self.config.channel,
            self.config.samples,
            self.config.sample_delay_us,
        );
        LightReading { raw, percent: self.normalize(raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::NoDelay;

    fn normalizer(bright_raw: RawSample, dark_raw: RawSample) -> LightNormalizer {
        LightNormalizer::new(LightConfig { bright_raw, dark_raw, ..LightConfig::default() })
    }

    #[test]
    fn calibration_points() {
        let light = LightNormalizer::default();
        assert_eq!(light.normalize(20), 100);
        assert_eq!(light.normalize(140), 0);
        assert_eq!(light.normalize(80), 50);
    }

    #[test]
    fn beyond_calibration_is_clamped() {
        let light = LightNormalizer::default();
        assert_eq!(light.normalize(0), 100);
        assert_eq!(light.normalize(255), 0);
    }

    #[test]
    fn equal_calibration_reads_zero() {
        let light = normalizer(90, 90);
        for raw in [0, 90, 255] {
            assert_eq!(light.normalize(raw), 0);
        }
    }

    #[test]
    fn reads_configured_channel() {
        struct ChannelAdc {
            last_channel: Option<u8>,
        }
        impl AnalogInput for ChannelAdc {
            fn read_channel(&mut self, channel: u8) -> RawSample {
                self.last_channel = Some(channel);
                110
            }
        }

        let mut adc = ChannelAdc { last_channel: None };
        let light = LightNormalizer::new(LightConfig { channel: 3, ..LightConfig::default() });
        let reading = light.read(&mut adc, &mut NoDelay);

        assert_eq!(adc.last_channel, Some(3));
        // (140 - 110) * 100 / 120 = 25
        assert_eq!(reading, LightReading { raw: 110, percent: 25 });
    }
}
