//! MQTT connector for StudyGuard
//!
//! Wraps a synchronous `rumqttc` client. A named background thread drives
//! the connection event loop: it connects, reconnects after failures and
//! tracks whether the broker is reachable. [`MqttConnector::send`] only
//! enqueues (`try_publish`), so a slow or absent broker costs the poll
//! loop nothing but a dropped record.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rumqttc::{Client, ClientError, Connection, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};

use crate::{ConnectionStats, Connector, ConnectorError};

/// Outgoing requests the client buffers before `send` reports a full buffer
const REQUEST_CAPACITY: usize = 16;

/// MQTT connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u16,
    /// 0, 1 or 2
    pub qos: u8,
    /// Pause after a connection error before the next attempt
    pub reconnect_delay_ms: u32,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            client_id: "studyguard".into(),
            keep_alive_secs: 30,
            qos: 0,
            reconnect_delay_ms: 2000,
        }
    }
}

impl MqttConfig {
    /// Defaults with the given broker host
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into(), ..Self::default() }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn qos(mut self, qos: u8) -> Self {
        self.qos = qos;
        self
    }

    fn quality_of_service(&self) -> Result<QoS, ConnectorError> {
        match self.qos {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            other => Err(ConnectorError::ConfigError(format!("qos must be 0, 1 or 2, got {}", other))),
        }
    }

    fn validate(&self) -> Result<(), ConnectorError> {
        if self.host.is_empty() {
            return Err(ConnectorError::ConfigError("host is empty".into()));
        }
        if self.client_id.is_empty() {
            return Err(ConnectorError::ConfigError("client_id is empty".into()));
        }
        self.quality_of_service().map(|_| ())
    }
}

/// State shared with the event loop thread
#[derive(Default)]
struct Link {
    connected: AtomicBool,
    closing: AtomicBool,
    stats: Mutex<ConnectionStats>,
}

impl Link {
    fn stats(&self) -> MutexGuard<'_, ConnectionStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Publishes over MQTT without blocking the caller
pub struct MqttConnector {
    client: Client,
    qos: QoS,
    link: Arc<Link>,
    event_loop: Option<JoinHandle<()>>,
}

impl MqttConnector {
    /// Validate `config` and start the event loop thread
    ///
    /// Returns before the broker is reached; [`is_connected`](Connector::is_connected)
    /// turns true once it acknowledges the connection.
    pub fn new(config: MqttConfig) -> Result<Self, ConnectorError> {
        config.validate()?;
        let qos = config.quality_of_service()?;

        let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

        let (client, connection) = Client::new(options, REQUEST_CAPACITY);
        let link = Arc::new(Link::default());
        let reconnect_delay = Duration::from_millis(u64::from(config.reconnect_delay_ms));

        let thread_link = Arc::clone(&link);
        let event_loop = thread::Builder::new()
            .name("mqtt-event-loop".into())
            .spawn(move || drive(connection, &thread_link, reconnect_delay))
            .map_err(|e| ConnectorError::ProtocolError(format!("event loop thread: {}", e)))?;

        log::info!("mqtt connecting to {}:{} as {}", config.host, config.port, config.client_id);

        Ok(Self { client, qos, link, event_loop: Some(event_loop) })
    }

    /// Disconnect and wait for the event loop to finish
    pub fn close(mut self) {
        self.shutdown();
        if let Some(handle) = self.event_loop.take() {
            if handle.join().is_err() {
                log::error!("mqtt event loop panicked");
            }
        }
    }

    fn shutdown(&mut self) {
        self.link.closing.store(true, Ordering::Relaxed);
        self.link.connected.store(false, Ordering::Relaxed);
        if let Err(e) = self.client.try_disconnect() {
            log::debug!("mqtt disconnect not queued: {}", e);
        }
    }
}

/// Event loop body: runs until the connector closes or drops its client
fn drive(mut connection: Connection, link: &Link, reconnect_delay: Duration) {
    let mut ever_connected = false;
    for notification in connection.iter() {
        if link.closing.load(Ordering::Relaxed) {
            break;
        }
        match notification {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                if ever_connected {
                    link.stats().reconnections += 1;
                }
                ever_connected = true;
                link.connected.store(true, Ordering::Relaxed);
                log::info!("mqtt connected");
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                link.connected.store(false, Ordering::Relaxed);
                log::warn!("mqtt broker closed the connection");
            }
            Ok(_) => {}
            Err(e) => {
                // Log once per outage, not once per retry
                if link.connected.swap(false, Ordering::Relaxed) {
                    log::warn!("mqtt connection lost: {}", e);
                } else {
                    log::debug!("mqtt connect failed: {}", e);
                }
                link.stats().last_error = Some(e.to_string());
                thread::sleep(reconnect_delay);
            }
        }
    }
    link.connected.store(false, Ordering::Relaxed);
    log::debug!("mqtt event loop stopped");
}

impl Connector for MqttConnector {
    type Error = ConnectorError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        let result = if self.is_connected() {
            self.client
                .try_publish(topic, self.qos, false, data.to_vec())
                .map_err(|e| match e {
                    ClientError::TryRequest(_) => ConnectorError::BufferFull,
                    ClientError::Request(_) => ConnectorError::NotConnected,
                })
        } else {
            Err(ConnectorError::NotConnected)
        };

        let mut stats = self.link.stats();
        match &result {
            Ok(()) => stats.record_sent(data.len()),
            Err(e) => stats.record_failure(e),
        }
        result
    }

    fn is_connected(&self) -> bool {
        self.link.connected.load(Ordering::Relaxed)
    }

    fn stats(&self) -> ConnectionStats {
        self.link.stats().clone()
    }
}

impl Drop for MqttConnector {
    fn drop(&mut self) {
        // The thread exits on its own once the client is gone; a pending
        // connect attempt is not worth blocking on.
        if self.event_loop.is_some() {
            self.shutdown();
        }
    }
}
