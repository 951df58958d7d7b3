//! Display-mode button
//!
//! The button is wired to a pulled-up input, so a press pulls the line low.
//! A press is the *edge* from high to low, not the low level itself; holding
//! the button down is still one press.
//!
//! ```text
//! level  ‾‾‾‾‾‾‾\_______________/‾‾‾‾‾‾
//!               ^ press: beep, flip mode, hold 200 ms
//! ```

use std::thread::{self, JoinHandle};
use std::time::Duration;

use embedded_hal::digital::OutputPin;

use crate::{
    config::{ActiveLevel, HardwareConfig, TimingConfig},
    errors::{ActuatorError, ActuatorResult},
    shared::{SharedHandle, StopFlag},
    traits::{Buzzer, DigitalInput},
};

/// Buzzer on a plain GPIO line, honoring its active level
pub struct GpioBuzzer<P> {
    pin: P,
    active: ActiveLevel,
}

impl<P: OutputPin> GpioBuzzer<P> {
    /// Buzzer on `pin`, on at `active`
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    /// Buzzer with the active level from the wiring config
    pub fn from_config(pin: P, hardware: &HardwareConfig) -> Self {
        Self::new(pin, hardware.buzzer_active)
    }

    /// Give the pin back
    pub fn into_pin(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Buzzer for GpioBuzzer<P> {
    fn set_buzzer(&mut self, on: bool) -> ActuatorResult<()> {
        let high = match self.active {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        };
        let written = if high { self.pin.set_high() } else { self.pin.set_low() };
        written.map_err(|_| ActuatorError::WriteFailed { device: "buzzer", reason: "gpio write failed" })
    }
}

/// Watches the button and flips the display mode on each press
pub struct ModeToggle<I, Z> {
    input: I,
    buzzer: Z,
    shared: SharedHandle,
    poll: Duration,
    debounce: Duration,
    beep: Duration,
}

impl<I: DigitalInput, Z: Buzzer> ModeToggle<I, Z> {
    /// Toggle polling `input`, beeping on `buzzer`
    pub fn new(input: I, buzzer: Z, shared: SharedHandle, timing: &TimingConfig) -> Self {
        Self {
            input,
            buzzer,
            shared,
            poll: Duration::from_millis(u64::from(timing.button_poll_ms)),
            debounce: Duration::from_millis(u64::from(timing.debounce_ms)),
            beep: Duration::from_millis(u64::from(timing.beep_ms)),
        }
    }

    /// Sound the acknowledgment beep
    pub fn beep(&mut self) -> ActuatorResult<()> {
        self.buzzer.set_buzzer(true)?;
        thread::sleep(self.beep);
        self.buzzer.set_buzzer(false)
    }

    fn on_press(&mut self) {
        if let Err(e) = self.beep() {
            log::warn!("buzzer failed: {}", e);
            // Never leave it sounding
            let _ = self.buzzer.set_buzzer(false);
        }
        let mode = self.shared.toggle_display_mode();
        log::info!("Pressed -> mode: {}", mode.label());
        thread::sleep(self.debounce);
    }

    /// Poll until `stop` is raised
    pub fn run(&mut self, stop: &StopFlag) {
        let mut last = self.input.read_level();

        while !stop.is_stopped() {
            let current = self.input.read_level();
            if last && !current {
                self.on_press();
            }
            last = current;
            thread::sleep(self.poll);
        }
    }

    /// Turn the buzzer off and hand the hardware back
    pub fn into_parts(mut self) -> (I, Z, ActuatorResult<()>) {
        let result = self.buzzer.set_buzzer(false);
        (self.input, self.buzzer, result)
    }
}

impl<I, Z> ModeToggle<I, Z>
where
    I: DigitalInput + Send + 'static,
    Z: Buzzer + Send + 'static,
{
    /// Start polling on a named thread
    pub fn spawn(mut self) -> std::io::Result<ToggleHandle<I, Z>> {
        let stop = StopFlag::new();
        let thread_stop = stop.clone();
        let thread = thread::Builder::new()
            .name("mode-toggle".into())
            .spawn(move || {
                self.run(&thread_stop);
                self
            })?;
        log::debug!("mode toggle thread started");

        Ok(ToggleHandle { stop, thread: Some(thread) })
    }
}

/// Running toggle thread
///
/// Dropping the handle without [`stop`](Self::stop) still stops the thread
/// and silences the buzzer.
pub struct ToggleHandle<I: DigitalInput, Z: Buzzer> {
    stop: StopFlag,
    thread: Option<JoinHandle<ModeToggle<I, Z>>>,
}

/// Hardware returned by a stopped toggle thread
pub struct StoppedToggle<I, Z> {
    /// Button input
    pub input: I,
    /// Acknowledgment buzzer
    pub buzzer: Z,
}

impl<I: DigitalInput, Z: Buzzer> ToggleHandle<I, Z> {
    /// Stop the thread and silence the buzzer
    ///
    /// Returns the hardware on success. A panicked thread took its hardware
    /// with it and is reported as an unavailable buzzer.
    pub fn stop(mut self) -> ActuatorResult<StoppedToggle<I, Z>> {
        let toggle = self.halt().ok_or(ActuatorError::Unavailable { device: "buzzer" })?;
        let (input, buzzer, silenced) = toggle.into_parts();
        silenced.map(|()| StoppedToggle { input, buzzer })
    }

    fn halt(&mut self) -> Option<ModeToggle<I, Z>> {
        self.stop.stop();
        match self.thread.take()?.join() {
            Ok(toggle) => Some(toggle),
            Err(_) => {
                log::error!("mode toggle thread panicked");
                None
            }
        }
    }
}

impl<I: DigitalInput, Z: Buzzer> Drop for ToggleHandle<I, Z> {
    fn drop(&mut self) {
        if let Some(toggle) = self.halt() {
            let (_, _, silenced) = toggle.into_parts();
            if let Err(e) = silenced {
                log::warn!("buzzer not silenced: {}", e);
            }
        }
    }
}
