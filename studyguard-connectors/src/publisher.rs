//! JSON telemetry over any connector

use studyguard_core::telemetry::{TelemetryRecord, TelemetrySink};

use crate::{Connector, ConnectorError};

/// Topic used when none is configured
pub const DEFAULT_TELEMETRY_TOPIC: &str = "studyguard/telemetry";

/// [`TelemetrySink`] that sends each record as JSON on one topic
pub struct TelemetryPublisher<C> {
    connector: C,
    topic: String,
}

impl<C: Connector> TelemetryPublisher<C> {
    pub fn new(connector: C) -> Self {
        Self::with_topic(connector, DEFAULT_TELEMETRY_TOPIC)
    }

    pub fn with_topic(connector: C, topic: impl Into<String>) -> Self {
        Self { connector, topic: topic.into() }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn into_connector(self) -> C {
        self.connector
    }
}

impl<C: Connector> TelemetrySink for TelemetryPublisher<C> {
    type Error = ConnectorError;

    fn publish(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        let payload = record.to_json()?;
        self.connector.send(&self.topic, &payload).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionStats;
    use studyguard_core::{compute_study_score, Reason, Reasons};

    #[derive(Default)]
    struct Capture {
        sent: Vec<(String, Vec<u8>)>,
        offline: bool,
    }

    impl Connector for Capture {
        type Error = ConnectorError;

        fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
            if self.offline {
                return Err(ConnectorError::NotConnected);
            }
            self.sent.push((topic.to_string(), data.to_vec()));
            Ok(())
        }

        fn is_connected(&self) -> bool {
            !self.offline
        }

        fn stats(&self) -> ConnectionStats {
            ConnectionStats::default()
        }
    }

    fn record() -> TelemetryRecord {
        let mut reasons = Reasons::new();
        reasons.push(Reason::Loud).unwrap();
        TelemetryRecord::new(&compute_study_score(Some(22.0), 50, 20), &reasons)
    }

    #[test]
    fn sends_json_on_default_topic() {
        let mut publisher = TelemetryPublisher::new(Capture::default());
        publisher.publish(&record()).unwrap();

        let (topic, payload) = &publisher.connector().sent[0];
        assert_eq!(topic, DEFAULT_TELEMETRY_TOPIC);
        let json: serde_json::Value = serde_json::from_slice(payload).unwrap();
        assert_eq!(json["score"], 75);
        assert_eq!(json["reasons"], serde_json::json!(["loud"]));
    }

    #[test]
    fn custom_topic() {
        let mut publisher = TelemetryPublisher::with_topic(Capture::default(), "room/42");
        publisher.publish(&record()).unwrap();
        assert_eq!(publisher.into_connector().sent[0].0, "room/42");
    }

    #[test]
    fn connector_error_is_returned() {
        let mut publisher = TelemetryPublisher::new(Capture { offline: true, ..Capture::default() });
        let err = publisher.publish(&record()).unwrap_err();
        assert!(matches!(err, ConnectorError::NotConnected));
    }
}
