//! RGB discomfort indicator
//!
//! Solid green while the room is fine, blinking red while it is not. Runs on
//! its own thread and follows the shared uncomfortable flag:
//!
//! ```text
//! flag   false ──────────────┐ true ─────────────────────────
//! led    green green green   │ red  off  red  off  red  off
//!        └50ms┘              │ └100┘└100┘
//! ```
//!
//! The three channel writes making up one color are serialized behind a
//! mutex in [`RgbLed`], so the blink thread and the shutdown path never
//! interleave channels.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::{
    config::{HardwareConfig, LedPolarity, TimingConfig},
    errors::ActuatorResult,
    shared::{SharedHandle, StopFlag},
    traits::{PwmChannel, RgbColor, RgbOutput},
};

/// Thread-safe handle to an RGB output
///
/// Clones share the same output and the same lock.
pub struct RgbLed<O> {
    output: Arc<Mutex<O>>,
}

impl<O> Clone for RgbLed<O> {
    fn clone(&self) -> Self {
        Self { output: Arc::clone(&self.output) }
    }
}

impl<O: RgbOutput> RgbLed<O> {
    /// Wrap `output` for sharing between threads
    pub fn new(output: O) -> Self {
        Self { output: Arc::new(Mutex::new(output)) }
    }

    // A panic while holding the lock can not leave a half-written color
    // behind that matters more than a dark LED, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, O> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write all three channels as one step
    pub fn set_color(&self, color: RgbColor) -> ActuatorResult<()> {
        self.lock().set_color(color)
    }

    /// All channels dark
    pub fn off(&self) -> ActuatorResult<()> {
        self.set_color(RgbColor::OFF)
    }

    /// Release the hardware; the LED must not be driven afterwards
    pub fn release(&self) -> ActuatorResult<()> {
        self.lock().release()
    }

    /// Run `f` against the output under the lock
    pub fn with_output<R>(&self, f: impl FnOnce(&mut O) -> R) -> R {
        f(&mut self.lock())
    }
}

/// Three PWM channels driven as one RGB output
///
/// Applies the LED's wiring polarity at the last step: a common-anode LED
/// is lit by a *low* duty cycle, so intensity `v` becomes duty `100 - v`.
pub struct PwmRgb<R, G, B> {
    red: R,
    green: G,
    blue: B,
    polarity: LedPolarity,
}

impl<R: PwmChannel, G: PwmChannel, B: PwmChannel> PwmRgb<R, G, B> {
    /// Channels wired with the given polarity
    pub fn new(red: R, green: G, blue: B, polarity: LedPolarity) -> Self {
        Self { red, green, blue, polarity }
    }

    /// Channels wired as the config's `led_polarity` describes
    pub fn from_config(red: R, green: G, blue: B, hardware: &HardwareConfig) -> Self {
        Self::new(red, green, blue, hardware.led_polarity)
    }

    fn duty(&self, intensity: u8) -> u8 {
        let intensity = intensity.min(100);
        match self.polarity {
            LedPolarity::CommonAnode => 100 - intensity,
            LedPolarity::CommonCathode => intensity,
        }
    }

    /// Consume the adapter and return the channels
    pub fn into_channels(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R: PwmChannel, G: PwmChannel, B: PwmChannel> RgbOutput for PwmRgb<R, G, B> {
    fn set_color(&mut self, color: RgbColor) -> ActuatorResult<()> {
        let (r, g, b) = (self.duty(color.red), self.duty(color.green), self.duty(color.blue));
        self.red.set_duty_percent(r)?;
        self.green.set_duty_percent(g)?;
        self.blue.set_duty_percent(b)
    }

    // Every channel is stopped even if an earlier one fails
    fn release(&mut self) -> ActuatorResult<()> {
        let results = [self.red.stop(), self.green.stop(), self.blue.stop()];
        results.into_iter().collect()
    }
}

/// Blink loop driving an [`RgbLed`] from the shared uncomfortable flag
pub struct IndicatorController<O> {
    led: RgbLed<O>,
    shared: SharedHandle,
    blink_on: Duration,
    blink_off: Duration,
    idle_poll: Duration,
}

impl<O: RgbOutput> IndicatorController<O> {
    /// Blink loop driving `led` from the shared flag
    pub fn new(led: RgbLed<O>, shared: SharedHandle, timing: &TimingConfig) -> Self {
        Self {
            led,
            shared,
            blink_on: Duration::from_millis(u64::from(timing.blink_on_ms)),
            blink_off: Duration::from_millis(u64::from(timing.blink_off_ms)),
            idle_poll: Duration::from_millis(u64::from(timing.idle_poll_ms)),
        }
    }

    /// Loop until `stop` is raised
    ///
    /// Leaves the LED in whatever state the last iteration set; the caller
    /// turns it off.
    pub fn run(&self, stop: &StopFlag) {
        let mut lit = false;
        let mut failing = false;

        while !stop.is_stopped() {
            let (color, hold) = if self.shared.is_uncomfortable() {
                lit = !lit;
                if lit {
                    (RgbColor::RED, self.blink_on)
                } else {
                    (RgbColor::OFF, self.blink_off)
                }
            } else {
                lit = false;
                (RgbColor::GREEN, self.idle_poll)
            };

            match self.led.set_color(color) {
                Ok(()) => failing = false,
                Err(e) => {
                    // Once per failure streak, not once per blink
                    if !failing {
                        log::warn!("indicator write failed: {}", e);
                    }
                    failing = true;
                }
            }

            thread::sleep(hold);
        }
    }
}

impl<O: RgbOutput + Send + 'static> IndicatorController<O> {
    /// Start the blink loop on a named thread
    pub fn spawn(self) -> std::io::Result<IndicatorHandle<O>> {
        let stop = StopFlag::new();
        let led = self.led.clone();
        let thread_stop = stop.clone();
        let thread = thread::Builder::new()
            .name("indicator".into())
            .spawn(move || self.run(&thread_stop))?;
        log::debug!("indicator thread started");

        Ok(IndicatorHandle { stop, thread: Some(thread), led })
    }
}

/// Running indicator thread
pub struct IndicatorHandle<O: RgbOutput> {
    stop: StopFlag,
    thread: Option<JoinHandle<()>>,
    led: RgbLed<O>,
}

impl<O: RgbOutput> IndicatorHandle<O> {
    /// The LED the thread drives
    pub fn led(&self) -> &RgbLed<O> {
        &self.led
    }

    /// Stop the thread, turn the LED off and release it
    ///
    /// Release is attempted even if turning off failed; the first error is
    /// returned.
    pub fn stop(mut self) -> ActuatorResult<()> {
        self.halt();
        let off = self.led.off();
        let release = self.led.release();
        off.and(release)
    }

    fn halt(&mut self) {
        self.stop.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("indicator thread panicked");
            }
        }
    }
}

impl<O: RgbOutput> Drop for IndicatorHandle<O> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.halt();
            let _ = self.led.off();
        }
    }
}
