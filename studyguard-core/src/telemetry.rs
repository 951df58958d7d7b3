//! Telemetry record and sink
//!
//! Once per poll the monitor hands a [`TelemetryRecord`] to its sink. The
//! sink is injected; a station without networking uses [`NoopSink`] and
//! takes the same code path as one publishing over MQTT.
//!
//! Wire format (JSON):
//!
//! ```json
//! {
//!   "temperature_score": 100.0,
//!   "light_score": 50,
//!   "sound_score": 80,
//!   "score": 75,
//!   "is_uncomfortable": true,
//!   "reasons": ["dark", "loud"]
//! }
//! ```

use core::convert::Infallible;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::Reasons;
use crate::score::ScoreBreakdown;

/// What gets published for one poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// `null` when the temperature was unknown
    pub temperature_score: Option<f64>,
    /// Light term, the light percentage
    pub light_score: u8,
    /// Sound term, `100 - sound`
    pub sound_score: u8,
    /// Study score, 0 to 100
    pub score: u8,
    /// Any reason raised this poll
    pub is_uncomfortable: bool,
    /// Reasons, in fixed order
    pub reasons: Reasons,
}

impl TelemetryRecord {
    /// Record for one poll
    pub fn new(breakdown: &ScoreBreakdown, reasons: &Reasons) -> Self {
        Self {
            temperature_score: breakdown.temperature_score,
            light_score: breakdown.light_score,
            sound_score: breakdown.sound_score,
            score: breakdown.score,
            is_uncomfortable: !reasons.is_empty(),
            reasons: reasons.clone(),
        }
    }

    /// Serialize as a compact JSON object
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Destination for per-poll telemetry
pub trait TelemetrySink {
    type Error: fmt::Display;

    /// Publish one record. Must not block for long: it runs inside the poll loop.
    fn publish(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error>;
}

/// Sink that drops every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    type Error = Infallible;

    fn publish(&mut self, _record: &TelemetryRecord) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Box<S> {
    type Error = S::Error;

    fn publish(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        (**self).publish(record)
    }
}
