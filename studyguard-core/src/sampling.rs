//! Stable ADC sampling
//!
//! The PCF8591 returns the *previous* conversion on every read, so the first
//! read after selecting a channel belongs to whatever was sampled before.
//! `read_stable` throws that read away and averages the second one over a
//! few iterations.

use embedded_hal::delay::DelayNs;

use crate::traits::{AnalogInput, RawSample};

/// Average `samples` settled reads from `channel`.
///
/// Each iteration reads twice, keeps the second read, then waits `delay_us`.
/// The result is truncated, never rounded. `samples == 0` is treated as 1.
pub fn read_stable<A, D>(
    adc: &mut A,
    delay: &mut D,
    channel: u8,
    samples: u16,
    delay_us: u32,
) -> RawSample
where
    A: AnalogInput + ?Sized,
    D: DelayNs + ?Sized,
{
    let samples = samples.max(1);
    let mut total: u32 = 0;

    for _ in 0..samples {
        let _settling = adc.read_channel(channel);
        total += u32::from(adc.read_channel(channel));
        if delay_us > 0 {
            delay.delay_us(delay_us);
        }
    }

    (total / u32::from(samples)) as RawSample
}

/// `DelayNs` backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        if ns > 0 {
            std::thread::sleep(core::time::Duration::from_nanos(u64::from(ns)));
        }
    }
}

/// `DelayNs` that returns immediately
///
/// For tests and for converters that already block for their conversion time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a stale value on every odd read, the real one on even reads
    struct StaleFirstAdc {
        reads: u32,
        values: [RawSample; 4],
        next: usize,
    }

    impl AnalogInput for StaleFirstAdc {
        fn read_channel(&mut self, _channel: u8) -> RawSample {
            self.reads += 1;
            if self.reads % 2 == 1 {
                return 255;
            }
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    #[test]
    fn discards_settling_read() {
        let mut adc = StaleFirstAdc { reads: 0, values: [10, 20, 30, 40], next: 0 };
        let value = read_stable(&mut adc, &mut NoDelay, 0, 4, 0);
        assert_eq!(value, 25);
        assert_eq!(adc.reads, 8);
    }

    #[test]
    fn average_truncates() {
        let mut adc = StaleFirstAdc { reads: 0, values: [10, 11, 11, 11], next: 0 };
        // (10 + 11 + 11) / 3 = 10.67
        assert_eq!(read_stable(&mut adc, &mut NoDelay, 0, 3, 0), 10);
    }

    #[test]
    fn zero_samples_reads_once() {
        let mut adc = StaleFirstAdc { reads: 0, values: [42, 0, 0, 0], next: 0 };
        assert_eq!(read_stable(&mut adc, &mut NoDelay, 1, 0, 0), 42);
        assert_eq!(adc.reads, 2);
    }

    #[test]
    fn waits_between_samples() {
        struct CountingDelay(u32);
        impl DelayNs for CountingDelay {
            fn delay_ns(&mut self, ns: u32) {
                self.0 += ns;
            }
        }

        let mut adc = StaleFirstAdc { reads: 0, values: [1, 1, 1, 1], next: 0 };
        let mut delay = CountingDelay(0);
        read_stable(&mut adc, &mut delay, 0, 4, 800);
        assert_eq!(delay.0, 4 * 800 * 1000);
    }
}
