//! Hardware traits
//!
//! The monitor never talks to GPIO, I2C or sysfs directly. Each sensor and
//! actuator sits behind one of these traits so the same loops run on a
//! Raspberry Pi, on a microcontroller, or against mocks in tests.
//! Keep them small - one method per thing the hardware can actually do.

use crate::errors::ActuatorResult;

/// Raw ADC sample. 0..=255 on the 8-bit PCF8591.
pub type RawSample = u16;

/// Multi-channel analog-to-digital converter
pub trait AnalogInput {
    /// Read one conversion from `channel`.
    ///
    /// The first read after a channel switch may return the previous
    /// channel's value; callers that care discard it.
    fn read_channel(&mut self, channel: u8) -> RawSample;
}

/// External temperature probe
pub trait TemperatureSensor {
    /// Current temperature in Celsius, `None` if the probe could not be read
    fn read_celsius(&mut self) -> Option<f32>;
}

/// Color as three channel intensities, each 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbColor {
    /// Intensity, 0 to 100
    pub red: u8,
    /// Intensity, 0 to 100
    pub green: u8,
    /// Intensity, 0 to 100
    pub blue: u8,
}

impl RgbColor {
    /// All channels off
    pub const OFF: Self = Self::new(0, 0, 0);
    /// Full-intensity red
    pub const RED: Self = Self::new(100, 0, 0);
    /// Full-intensity green
    pub const GREEN: Self = Self::new(0, 100, 0);

    /// Build a color, clamping each channel to 100
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: clamp_intensity(red),
            green: clamp_intensity(green),
            blue: clamp_intensity(blue),
        }
    }
}

const fn clamp_intensity(value: u8) -> u8 {
    if value > 100 { 100 } else { value }
}

/// RGB light output
pub trait RgbOutput {
    /// Drive all three channels to `color`
    fn set_color(&mut self, color: RgbColor) -> ActuatorResult<()>;

    /// Release the underlying hardware (stop PWM, free pins)
    fn release(&mut self) -> ActuatorResult<()> {
        Ok(())
    }
}

/// Single PWM channel driven by duty cycle
pub trait PwmChannel {
    /// Set the duty cycle, 0..=100 percent
    fn set_duty_percent(&mut self, duty: u8) -> ActuatorResult<()>;

    /// Stop generating the PWM signal
    fn stop(&mut self) -> ActuatorResult<()> {
        Ok(())
    }
}

/// On/off acoustic actuator
pub trait Buzzer {
    /// Logical on/off; electrical polarity is the implementor's concern
    fn set_buzzer(&mut self, on: bool) -> ActuatorResult<()>;
}

/// Character display with fixed-width rows
pub trait CharDisplay {
    /// Write `text` to `row`, starting at column 0
    fn write_line(&mut self, row: u8, text: &str) -> ActuatorResult<()>;

    /// Blank the whole display
    fn clear(&mut self) -> ActuatorResult<()>;
}

/// Digital input pin
pub trait DigitalInput {
    /// `true` when the pin reads high
    fn read_level(&mut self) -> bool;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_channel(&mut self, channel: u8) -> RawSample {
        (**self).read_channel(channel)
    }
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for &mut T {
    fn read_celsius(&mut self) -> Option<f32> {
        (**self).read_celsius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_channels_clamped() {
        let color = RgbColor::new(150, 100, 7);
        assert_eq!(color, RgbColor { red: 100, green: 100, blue: 7 });
    }

    #[test]
    fn named_colors() {
        assert_eq!(RgbColor::default(), RgbColor::OFF);
        assert_eq!(RgbColor::RED.red, 100);
        assert_eq!(RgbColor::GREEN.green, 100);
    }
}
