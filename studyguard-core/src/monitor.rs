//! Main poll loop
//!
//! One iteration reads the three sensors, classifies, scores, publishes the
//! uncomfortable flag for the indicator thread, logs the console line,
//! renders the display and hands a telemetry record to the sink. The loop
//! is the only owner of the classifier counters and the sound baseline.

use core::fmt;
use std::thread;
use std::time::{Duration, Instant};

use crate::{
    classifier::{DiscomfortClassifier, Reasons},
    config::MonitorConfig,
    display::{format_temperature, DisplayFrame, DisplayMode, JoinedReasons},
    errors::ActuatorResult,
    sampling::StdDelay,
    score::{compute_study_score, ScoreBreakdown},
    sensors::{LightNormalizer, LightReading, SoundLevelProcessor, SoundReading},
    shared::{SharedHandle, StopFlag},
    telemetry::{NoopSink, TelemetryRecord, TelemetrySink},
    traits::{AnalogInput, CharDisplay, TemperatureSensor},
};

/// Everything one poll produced
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    /// Probe reading in °C; `None` when absent or not finite
    pub temperature: Option<f32>,
    /// Light reading
    pub light: LightReading,
    /// Sound reading
    pub sound: SoundReading,
    /// Discomfort reasons raised this poll
    pub reasons: Reasons,
    /// Study score and its terms
    pub score: ScoreBreakdown,
    /// Mode the display was rendered in
    pub mode: DisplayMode,
}

impl PollReport {
    /// Any reason raised
    pub fn is_uncomfortable(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Frame for the mode this poll ran in
    pub fn frame(&self) -> DisplayFrame {
        match self.mode {
            DisplayMode::Score => DisplayFrame::score(self.score.score),
            DisplayMode::Stats => {
                DisplayFrame::stats(self.temperature, self.light.percent, self.sound.percent, &self.reasons)
            }
        }
    }

    /// Record published for this poll
    pub fn telemetry(&self) -> TelemetryRecord {
        TelemetryRecord::new(&self.score, &self.reasons)
    }

    /// The per-poll console line
    pub fn console_line(&self) -> ConsoleLine<'_> {
        ConsoleLine(self)
    }
}

/// `Temp:23.12C | Light: 80 ( 50%) | Sound: 20% | Score: 75`, followed by
/// the reasons when there are any
pub struct ConsoleLine<'a>(&'a PollReport);

impl fmt::Display for ConsoleLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write!(
            f,
            "Temp:{} | Light:{:3} ({:3}%) | Sound:{:3}% | Score:{:3}",
            format_temperature(report.temperature),
            report.light.raw,
            report.light.percent,
            report.sound.percent,
            report.score.score,
        )?;
        if report.is_uncomfortable() {
            write!(f, "  >>> UNCOMFORTABLE: {}", JoinedReasons(&report.reasons, ", "))?;
        }
        Ok(())
    }
}

/// The poll loop and the state it owns
pub struct Monitor<A, T, D, S = NoopSink> {
    adc: A,
    thermometer: T,
    display: D,
    sink: S,
    shared: SharedHandle,
    light: LightNormalizer,
    sound: SoundLevelProcessor,
    classifier: DiscomfortClassifier,
    delay: StdDelay,
    period: Duration,
}

impl<A, T, D> Monitor<A, T, D, NoopSink>
where
    A: AnalogInput,
    T: TemperatureSensor,
    D: CharDisplay,
{
    /// Monitor that publishes no telemetry
    pub fn new(config: &MonitorConfig, adc: A, thermometer: T, display: D, shared: SharedHandle) -> Self {
        Self {
            adc,
            thermometer,
            display,
            sink: NoopSink,
            shared,
            light: LightNormalizer::new(config.light),
            sound: SoundLevelProcessor::new(config.sound),
            classifier: DiscomfortClassifier::new(config.thresholds),
            delay: StdDelay,
            period: config.timing.loop_period(),
        }
    }
}

impl<A, T, D, S> Monitor<A, T, D, S>
where
    A: AnalogInput,
    T: TemperatureSensor,
    D: CharDisplay,
    S: TelemetrySink,
{
    /// Replace the telemetry sink
    pub fn with_telemetry<S2: TelemetrySink>(self, sink: S2) -> Monitor<A, T, D, S2> {
        Monitor {
            adc: self.adc,
            thermometer: self.thermometer,
            display: self.display,
            sink,
            shared: self.shared,
            light: self.light,
            sound: self.sound,
            classifier: self.classifier,
            delay: self.delay,
            period: self.period,
        }
    }

    /// Classifier state, for inspection
    pub fn classifier(&self) -> &DiscomfortClassifier {
        &self.classifier
    }

    /// Sound processor, with its learned baseline
    pub fn sound(&self) -> &SoundLevelProcessor {
        &self.sound
    }

    /// Telemetry sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The display written each poll
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run one full cycle
    ///
    /// Display and telemetry failures are logged; the report is produced
    /// regardless.
    pub fn poll_once(&mut self) -> PollReport {
        let temperature = self.thermometer.read_celsius().filter(|t| t.is_finite());
        let light = self.light.read(&mut self.adc, &mut self.delay);
        let sound = self.sound.read(&mut self.adc, &mut self.delay);

        let reasons = self.classifier.update(temperature, light.percent, sound.percent);
        let score = compute_study_score(temperature, light.percent, sound.percent);
        self.shared.set_uncomfortable(!reasons.is_empty());

        let report = PollReport {
            temperature,
            light,
            sound,
            reasons,
            score,
            mode: self.shared.display_mode(),
        };
        log::info!("{}", report.console_line());

        if let Err(e) = self.render(&report.frame()) {
            log::warn!("display write failed: {}", e);
        }
        if let Err(e) = self.sink.publish(&report.telemetry()) {
            log::warn!("telemetry publish failed: {}", e);
        }

        report
    }

    /// Blank both rows
    pub fn clear_display(&mut self) -> ActuatorResult<()> {
        self.display.clear()
    }

    fn render(&mut self, frame: &DisplayFrame) -> ActuatorResult<()> {
        for (row, line) in (0u8..).zip(frame.lines.iter()) {
            self.display.write_line(row, line)?;
        }
        Ok(())
    }

    /// Poll every period until `stop` is raised
    ///
    /// A cycle that overruns the period starts the next one immediately.
    pub fn run(&mut self, stop: &StopFlag) {
        log::debug!("poll loop started, period {:?}", self.period);
        while !stop.is_stopped() {
            let started = Instant::now();
            self.poll_once();
            if let Some(rest) = self.period.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
        log::debug!("poll loop stopped");
    }

    /// Clear the display and hand the hardware back
    pub fn shutdown(mut self) -> (MonitorParts<A, T, D, S>, ActuatorResult<()>) {
        let cleared = self.display.clear();
        let parts = MonitorParts {
            adc: self.adc,
            thermometer: self.thermometer,
            display: self.display,
            sink: self.sink,
        };
        (parts, cleared)
    }
}

/// Hardware and sink released by [`Monitor::shutdown`]
pub struct MonitorParts<A, T, D, S> {
    /// ADC
    pub adc: A,
    /// Temperature probe
    pub thermometer: T,
    /// 16x2 character display
    pub display: D,
    /// Telemetry sink
    pub sink: S,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Reason;
    use crate::config::{LightConfig, SoundConfig};
    use crate::errors::ActuatorError;
    use crate::shared::SharedState;
    use crate::traits::RawSample;

    /// Constant light, sound window alternating between two values
    struct FixedAdc {
        light: RawSample,
        sound: [RawSample; 2],
        flip: bool,
    }

    impl AnalogInput for FixedAdc {
        fn read_channel(&mut self, channel: u8) -> RawSample {
            if channel == 0 {
                self.light
            } else {
                self.flip = !self.flip;
                self.sound[usize::from(self.flip)]
            }
        }
    }

    struct Fixed(Option<f32>);

    impl TemperatureSensor for Fixed {
        fn read_celsius(&mut self) -> Option<f32> {
            self.0
        }
    }

    #[derive(Default)]
    struct Lcd {
        rows: [String; 2],
        cleared: bool,
        broken: bool,
    }

    impl CharDisplay for Lcd {
        fn write_line(&mut self, row: u8, text: &str) -> ActuatorResult<()> {
            if self.broken {
                return Err(ActuatorError::WriteFailed { device: "lcd", reason: "nack" });
            }
            self.rows[usize::from(row)] = text.to_string();
            Ok(())
        }

        fn clear(&mut self) -> ActuatorResult<()> {
            self.cleared = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Collect(Vec<TelemetryRecord>);

    impl TelemetrySink for Collect {
        type Error = core::convert::Infallible;

        fn publish(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
            self.0.push(record.clone());
            Ok(())
        }
    }

    fn config() -> MonitorConfig {
        let mut config = MonitorConfig::default();
        config.light = LightConfig { sample_delay_us: 0, ..LightConfig::default() };
        config.sound = SoundConfig { sample_delay_us: 0, window_samples: 4, ..SoundConfig::default() };
        config.timing.loop_period_ms = 1;
        config
    }

    fn monitor(light: RawSample, temp: Option<f32>) -> Monitor<FixedAdc, Fixed, Lcd> {
        let adc = FixedAdc { light, sound: [100, 100], flip: false };
        Monitor::new(&config(), adc, Fixed(temp), Lcd::default(), SharedState::new_handle())
    }

    #[test]
    fn console_line_format() {
        let mut monitor = monitor(80, Some(23.123));
        let report = monitor.poll_once();
        assert_eq!(report.console_line().to_string(), "Temp:23.12C | Light: 80 ( 50%) | Sound:  0% | Score: 79");
    }

    #[test]
    fn console_line_lists_reasons() {
        let mut monitor = monitor(140, None);
        let mut report = monitor.poll_once();
        for _ in 0..3 {
            report = monitor.poll_once();
        }
        assert_eq!(report.reasons.as_slice(), &[Reason::Dark]);
        assert!(report.console_line().to_string().ends_with(" >>> UNCOMFORTABLE: dark"));
        assert!(report.console_line().to_string().starts_with("Temp:N/A |"));
    }

    #[test]
    fn publishes_uncomfortable_flag() {
        let shared = SharedState::new_handle();
        let adc = FixedAdc { light: 140, sound: [100, 100], flip: false };
        let mut monitor = Monitor::new(&config(), adc, Fixed(Some(22.0)), Lcd::default(), shared.clone());

        for _ in 0..3 {
            monitor.poll_once();
            assert!(!shared.is_uncomfortable());
        }
        monitor.poll_once();
        assert!(shared.is_uncomfortable());
    }

    #[test]
    fn renders_per_mode() {
        let shared = SharedState::new_handle();
        let adc = FixedAdc { light: 80, sound: [100, 100], flip: false };
        let mut monitor = Monitor::new(&config(), adc, Fixed(Some(22.5)), Lcd::default(), shared.clone());

        monitor.poll_once();
        assert_eq!(monitor.display().rows[0], "T:22.50C L: 50% ");

        shared.set_display_mode(DisplayMode::Score);
        let report = monitor.poll_once();
        assert_eq!(monitor.display().rows[0], "Study Env Score ");
        assert_eq!(monitor.display().rows[1], format!("Score:{:4}/100  ", report.score.score));
    }

    #[test]
    fn display_failure_does_not_stop_poll() {
        let adc = FixedAdc { light: 80, sound: [100, 100], flip: false };
        let lcd = Lcd { broken: true, ..Lcd::default() };
        let mut monitor = Monitor::new(&config(), adc, Fixed(None), lcd, SharedState::new_handle());
        let report = monitor.poll_once();
        assert_eq!(report.light.percent, 50);
    }

    #[test]
    fn telemetry_sent_every_poll() {
        let mut monitor = monitor(20, Some(22.0)).with_telemetry(Collect::default());
        monitor.poll_once();
        monitor.poll_once();
        let sent = &monitor.sink().0;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].light_score, 100);
        assert!(!sent[1].is_uncomfortable);
    }

    #[test]
    fn nan_temperature_is_unknown() {
        let mut monitor = monitor(80, Some(f32::NAN));
        let report = monitor.poll_once();
        assert_eq!(report.temperature, None);
        assert_eq!(report.score.temperature_score, None);
    }

    #[test]
    fn run_stops_and_shutdown_clears() {
        let mut monitor = monitor(80, Some(22.0));
        let stop = StopFlag::new();
        stop.stop();
        monitor.run(&stop);

        let (parts, cleared) = monitor.shutdown();
        assert!(cleared.is_ok());
        assert!(parts.display.cleared);
    }
}
