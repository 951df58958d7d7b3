//! Telemetry connectors for StudyGuard
//!
//! ## Overview
//!
//! The core crate hands one [`TelemetryRecord`] per poll to a
//! [`TelemetrySink`]. This crate provides the sink that puts those records
//! on the network: [`TelemetryPublisher`] serializes each record to JSON
//! and sends it through any [`Connector`].
//!
//! ```text
//! Monitor ──TelemetryRecord──> TelemetryPublisher ──json bytes──> Connector ──> broker
//! ```
//!
//! ## Protocols
//!
//! ### MQTT (feature `mqtt`, default)
//!
//! Persistent connection to a broker, topic-based routing. The poll loop
//! must never wait on the network, so [`mqtt::MqttConnector`] only queues
//! messages; a background thread owns the socket and reconnects on its own.
//!
//! ## Example Usage
//!
//! ```no_run
//! use studyguard_connectors::{mqtt::{MqttConfig, MqttConnector}, TelemetryPublisher};
//!
//! let mqtt = MqttConnector::new(MqttConfig::new("broker.local"))?;
//! let publisher = TelemetryPublisher::new(mqtt);
//! // monitor.with_telemetry(publisher)
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "mqtt")]
pub mod mqtt;

mod publisher;

// Re-export common types
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttConnector};
pub use publisher::{TelemetryPublisher, DEFAULT_TELEMETRY_TOPIC};
pub use studyguard_core::telemetry::{TelemetryRecord, TelemetrySink};

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Not connected")]
    NotConnected,

    #[error("Buffer full")]
    BufferFull,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Trait for all protocol connectors
pub trait Connector {
    type Error: Into<ConnectorError>;

    /// Send one payload on `topic`
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Get connection statistics
    fn stats(&self) -> ConnectionStats;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Number of reconnections
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub(crate) fn record_failure(&mut self, error: &impl std::fmt::Display) {
        self.messages_failed += 1;
        self.last_error = Some(error.to_string());
    }
}
