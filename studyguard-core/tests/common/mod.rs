//! Mock hardware for integration tests
//!
//! Every mock is a cheap handle around `Arc<Mutex<_>>`: one clone goes into
//! the monitor or station, the test keeps another to steer inputs and
//! inspect what the actuators saw.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use studyguard_core::{
    config::MonitorConfig,
    constants::sensors::{LIGHT_CHANNEL, SOUND_CHANNEL},
    errors::ActuatorResult,
    traits::{AnalogInput, Buzzer, CharDisplay, DigitalInput, RawSample, RgbColor, RgbOutput, TemperatureSensor},
};

/// Config with no sampling delays and millisecond timings
pub fn fast_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.light.sample_delay_us = 0;
    config.sound.sample_delay_us = 0;
    config.timing.loop_period_ms = 2;
    config.timing.blink_on_ms = 1;
    config.timing.blink_off_ms = 1;
    config.timing.idle_poll_ms = 1;
    config.timing.button_poll_ms = 1;
    config.timing.debounce_ms = 1;
    config.timing.beep_ms = 1;
    config
}

struct AdcState {
    light: RawSample,
    sound: Vec<RawSample>,
    reads: usize,
}

/// ADC with a fixed light level and a repeating microphone waveform
///
/// Each waveform value is returned for two consecutive reads, so a settled
/// read (discard one, keep one) yields the waveform sample by sample.
#[derive(Clone)]
pub struct ScriptedAdc(Arc<Mutex<AdcState>>);

impl ScriptedAdc {
    pub fn new(light: RawSample, sound: &[RawSample]) -> Self {
        Self(Arc::new(Mutex::new(AdcState { light, sound: sound.to_vec(), reads: 0 })))
    }

    pub fn set_light(&self, light: RawSample) {
        self.0.lock().unwrap().light = light;
    }

    pub fn set_sound(&self, sound: &[RawSample]) {
        let mut state = self.0.lock().unwrap();
        state.sound = sound.to_vec();
        state.reads = 0;
    }
}

impl AnalogInput for ScriptedAdc {
    fn read_channel(&mut self, channel: u8) -> RawSample {
        let mut state = self.0.lock().unwrap();
        match channel {
            LIGHT_CHANNEL => state.light,
            SOUND_CHANNEL if !state.sound.is_empty() => {
                let value = state.sound[(state.reads / 2) % state.sound.len()];
                state.reads += 1;
                value
            }
            _ => 0,
        }
    }
}

/// Thermometer returning whatever the test last set
#[derive(Clone, Default)]
pub struct ScriptedThermometer(Arc<Mutex<Option<f32>>>);

impl ScriptedThermometer {
    pub fn new(temp_c: Option<f32>) -> Self {
        Self(Arc::new(Mutex::new(temp_c)))
    }

    pub fn set(&self, temp_c: Option<f32>) {
        *self.0.lock().unwrap() = temp_c;
    }
}

impl TemperatureSensor for ScriptedThermometer {
    fn read_celsius(&mut self) -> Option<f32> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub struct DisplayLog {
    pub rows: [String; 2],
    pub writes: usize,
    pub clears: usize,
}

/// Display that remembers the current rows
#[derive(Clone, Default)]
pub struct RecordingDisplay(Arc<Mutex<DisplayLog>>);

impl RecordingDisplay {
    pub fn rows(&self) -> [String; 2] {
        self.0.lock().unwrap().rows.clone()
    }

    pub fn clears(&self) -> usize {
        self.0.lock().unwrap().clears
    }
}

impl CharDisplay for RecordingDisplay {
    fn write_line(&mut self, row: u8, text: &str) -> ActuatorResult<()> {
        let mut log = self.0.lock().unwrap();
        log.rows[usize::from(row)] = text.to_string();
        log.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> ActuatorResult<()> {
        let mut log = self.0.lock().unwrap();
        log.rows = Default::default();
        log.clears += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct LedLog {
    pub colors: Vec<RgbColor>,
    pub released: bool,
}

/// RGB output recording every color written
#[derive(Clone, Default)]
pub struct RecordingLed(Arc<Mutex<LedLog>>);

impl RecordingLed {
    pub fn colors(&self) -> Vec<RgbColor> {
        self.0.lock().unwrap().colors.clone()
    }

    pub fn released(&self) -> bool {
        self.0.lock().unwrap().released
    }
}

impl RgbOutput for RecordingLed {
    fn set_color(&mut self, color: RgbColor) -> ActuatorResult<()> {
        self.0.lock().unwrap().colors.push(color);
        Ok(())
    }

    fn release(&mut self) -> ActuatorResult<()> {
        self.0.lock().unwrap().released = true;
        Ok(())
    }
}

/// Buzzer recording every on/off write
#[derive(Clone, Default)]
pub struct RecordingBuzzer(Arc<Mutex<Vec<bool>>>);

impl RecordingBuzzer {
    pub fn writes(&self) -> Vec<bool> {
        self.0.lock().unwrap().clone()
    }
}

impl Buzzer for RecordingBuzzer {
    fn set_buzzer(&mut self, on: bool) -> ActuatorResult<()> {
        self.0.lock().unwrap().push(on);
        Ok(())
    }
}

/// Pulled-up button replaying queued levels, then released (high)
#[derive(Clone, Default)]
pub struct ScriptedButton(Arc<Mutex<VecDeque<bool>>>);

impl ScriptedButton {
    /// Queue one press: held low for a few polls, then released
    pub fn press(&self) {
        let mut levels = self.0.lock().unwrap();
        levels.extend([true, false, false, false, true]);
    }
}

impl DigitalInput for ScriptedButton {
    fn read_level(&mut self) -> bool {
        self.0.lock().unwrap().pop_front().unwrap_or(true)
    }
}
