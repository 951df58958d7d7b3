//! Station composition
//!
//! Wires the poll loop, the indicator thread and the mode toggle thread
//! around one [`SharedState`](crate::shared::SharedState). The poll loop
//! runs on the caller's thread; the other two get their own.
//!
//! Teardown is per resource. The button thread, the LED and the display
//! are each shut down even if an earlier one failed, and every failure
//! ends up in the [`ShutdownReport`].

use core::fmt;

use crate::{
    config::MonitorConfig,
    errors::ActuatorError,
    indicator::{IndicatorController, IndicatorHandle, RgbLed},
    monitor::Monitor,
    shared::{SharedHandle, SharedState, StopFlag},
    telemetry::{NoopSink, TelemetrySink},
    toggle::{ModeToggle, ToggleHandle},
    traits::{AnalogInput, Buzzer, CharDisplay, DigitalInput, RgbOutput, TemperatureSensor},
};

/// Hardware a station is built from
pub struct StationHardware<A, T, D, O, I, Z> {
    /// Light and sound converter
    pub adc: A,
    /// Temperature probe
    pub thermometer: T,
    /// 16x2 character display
    pub display: D,
    /// RGB discomfort indicator
    pub led: O,
    /// Mode button, pulled up
    pub button: I,
    /// Acknowledgment buzzer
    pub buzzer: Z,
}

/// Which actuator a teardown failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Buzzer and button thread
    Buzzer,
    /// RGB indicator and its thread
    Led,
    /// Character display
    Display,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Component::Buzzer => "buzzer",
            Component::Led => "led",
            Component::Display => "display",
        })
    }
}

/// Outcome of tearing the station down
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShutdownReport {
    failures: Vec<(Component, ActuatorError)>,
}

impl ShutdownReport {
    /// Nothing failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures in teardown order
    pub fn failures(&self) -> &[(Component, ActuatorError)] {
        &self.failures
    }

    fn record<T>(&mut self, component: Component, result: Result<T, ActuatorError>) {
        if let Err(e) = result {
            log::error!("{} shutdown failed: {}", component, e);
            self.failures.push((component, e));
        }
    }
}

impl fmt::Display for ShutdownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("clean shutdown");
        }
        for (i, (component, error)) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", component, error)?;
        }
        Ok(())
    }
}

/// The complete monitor: poll loop, indicator and mode toggle
pub struct Station<A, T, D, O, I, Z, S = NoopSink> {
    shared: SharedHandle,
    monitor: Monitor<A, T, D, S>,
    indicator: IndicatorController<O>,
    toggle: ModeToggle<I, Z>,
}

impl<A, T, D, O, I, Z> Station<A, T, D, O, I, Z, NoopSink>
where
    A: AnalogInput,
    T: TemperatureSensor,
    D: CharDisplay,
    O: RgbOutput + Send + 'static,
    I: DigitalInput + Send + 'static,
    Z: Buzzer + Send + 'static,
{
    /// Build the three tasks around fresh shared state
    pub fn new(config: &MonitorConfig, hardware: StationHardware<A, T, D, O, I, Z>) -> Self {
        let shared = SharedState::new_handle();
        let led = RgbLed::new(hardware.led);

        Self {
            monitor: Monitor::new(
                config,
                hardware.adc,
                hardware.thermometer,
                hardware.display,
                shared.clone(),
            ),
            indicator: IndicatorController::new(led, shared.clone(), &config.timing),
            toggle: ModeToggle::new(hardware.button, hardware.buzzer, shared.clone(), &config.timing),
            shared,
        }
    }
}

impl<A, T, D, O, I, Z, S> Station<A, T, D, O, I, Z, S>
where
    A: AnalogInput,
    T: TemperatureSensor,
    D: CharDisplay,
    O: RgbOutput + Send + 'static,
    I: DigitalInput + Send + 'static,
    Z: Buzzer + Send + 'static,
    S: TelemetrySink,
{
    /// Publish telemetry through `sink` every poll
    pub fn with_telemetry<S2: TelemetrySink>(self, sink: S2) -> Station<A, T, D, O, I, Z, S2> {
        Station {
            shared: self.shared,
            monitor: self.monitor.with_telemetry(sink),
            indicator: self.indicator,
            toggle: self.toggle,
        }
    }

    /// Handle to the flags the tasks share
    pub fn shared(&self) -> &SharedHandle {
        &self.shared
    }

    /// Run until `stop` is raised, then tear everything down
    ///
    /// Fails only if a background thread can not be started; in that case
    /// whatever was already started is stopped again.
    pub fn run(self, stop: &StopFlag) -> std::io::Result<ShutdownReport> {
        let Station { mut monitor, indicator, toggle, .. } = self;

        if let Err(e) = monitor.clear_display() {
            log::warn!("display clear failed: {}", e);
        }

        let indicator = indicator.spawn()?;
        let toggle = match toggle.spawn() {
            Ok(toggle) => toggle,
            Err(e) => {
                log::error!("mode toggle thread not started: {}", e);
                teardown::<_, _, _, _, _, I, Z>(None, indicator, monitor);
                return Err(e);
            }
        };
        log::info!("station running");

        monitor.run(stop);

        let report = teardown(Some(toggle), indicator, monitor);
        if report.is_clean() {
            log::info!("station stopped");
        }
        Ok(report)
    }
}

/// Stop whatever is running, in order: button thread, LED, display
fn teardown<A, T, D, S, O, I, Z>(
    toggle: Option<ToggleHandle<I, Z>>,
    indicator: IndicatorHandle<O>,
    monitor: Monitor<A, T, D, S>,
) -> ShutdownReport
where
    A: AnalogInput,
    T: TemperatureSensor,
    D: CharDisplay,
    S: TelemetrySink,
    O: RgbOutput,
    I: DigitalInput,
    Z: Buzzer,
{
    let mut report = ShutdownReport::default();
    if let Some(toggle) = toggle {
        report.record(Component::Buzzer, toggle.stop());
    }
    report.record(Component::Led, indicator.stop());
    let (_, cleared) = monitor.shutdown();
    report.record(Component::Display, cleared);
    report
}
