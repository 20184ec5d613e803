//! Radio transport bridged over MQTT.
//!
//! Every node publishes its datagrams as JSON [`RadioPacket`]s to one topic
//! and subscribes to the same topic, so the broker plays the part of the
//! shared radio channel:
//!
//! ```text
//! microbit/radio   {"label":"CP1call","value":-1,"sender":"cop-1"}
//! microbit/radio   {"label":"ACK1call","value":-1,"sender":"elevator"}
//! ```
//!
//! Publishing uses QoS 0 and never blocks, matching a real radio: a datagram
//! that cannot be queued is reported as a send error and not retried.
//! Packets tagged with this node's own client id are dropped on receipt.
//! The subscription is restored whenever the broker reconnects without the
//! old session.
//!
//! # Example
//!
//! ```ignore
//! let config = MqttRuntimeConfig::from_config(&config.mqtt);
//! let (radio, eventloop) = MqttRadio::connect(config).await?;
//!
//! let mut panel = CallPanel::new(radio, ConsoleAudio, ConsoleDisplay::new(), &config)?;
//! ```

use std::time::Duration;

use rumqttc::{AsyncClient, ConnAck, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::MqttConfig;
use crate::messages::RadioPacket;
use crate::protocol::CallMessage;
use crate::traits::{RadioTransport, SendShape};

/// Capacity of the rumqttc request queue.
const REQUEST_CAPACITY: usize = 16;

/// Capacity of the inbound datagram queue.
const INBOUND_CAPACITY: usize = 32;

// ============================================================================
// Configuration
// ============================================================================

/// Runtime MQTT client configuration for `rumqttc`.
///
/// This struct uses `String` for runtime compatibility with the `rumqttc` library.
/// For embedded/no-alloc contexts, use [`MqttConfig`] which uses fixed-size
/// strings and convert with [`MqttRuntimeConfig::from_config`].
#[derive(Debug, Clone)]
pub struct MqttRuntimeConfig {
    /// MQTT broker hostname
    pub host: String,
    /// MQTT broker port
    pub port: u16,
    /// Client ID, also used as the packet sender
    pub client_id: String,
    /// Radio topic
    pub topic: String,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
}

impl Default for MqttRuntimeConfig {
    fn default() -> Self {
        Self::from_config(&MqttConfig::default())
    }
}

impl MqttRuntimeConfig {
    /// Create a new config with the given broker address
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from shared MqttConfig
    pub fn from_config(config: &MqttConfig) -> Self {
        Self {
            host: config.host.as_str().to_string(),
            port: config.port,
            client_id: config.client_id.as_str().to_string(),
            topic: config.topic.as_str().to_string(),
            keep_alive_secs: config.keep_alive_secs,
        }
    }

    /// Set the client ID
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Set the radio topic
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive_secs as u64));
        options
    }
}

// ============================================================================
// MQTT Radio
// ============================================================================

/// [`RadioTransport`] over an MQTT topic.
pub struct MqttRadio {
    client: AsyncClient,
    incoming: mpsc::Receiver<RadioPacket>,
    config: MqttRuntimeConfig,
}

impl MqttRadio {
    /// Connect to the broker and subscribe to the radio topic.
    ///
    /// Spawns the event loop on the current tokio runtime. Inbound packets
    /// are queued until [`try_recv`](RadioTransport::try_recv) picks them up.
    pub async fn connect(config: MqttRuntimeConfig) -> Result<(Self, JoinHandle<()>), MqttError> {
        let (client, eventloop) = AsyncClient::new(config.options(), REQUEST_CAPACITY);

        client
            .subscribe(&config.topic, QoS::AtMostOnce)
            .await
            .map_err(|e| MqttError::Subscribe(e.to_string()))?;

        info!(
            host = %config.host,
            port = config.port,
            topic = %config.topic,
            "MQTT radio subscribed"
        );

        let (tx, rx) = mpsc::channel(INBOUND_CAPACITY);
        let handle = tokio::spawn(run_eventloop(
            eventloop,
            client.clone(),
            tx,
            config.client_id.clone(),
            config.topic.clone(),
        ));

        Ok((Self::from_parts(client, rx, config), handle))
    }

    /// Build a radio from an existing client and inbound queue.
    pub fn from_parts(
        client: AsyncClient,
        incoming: mpsc::Receiver<RadioPacket>,
        config: MqttRuntimeConfig,
    ) -> Self {
        Self {
            client,
            incoming,
            config,
        }
    }

    /// The runtime configuration.
    pub fn config(&self) -> &MqttRuntimeConfig {
        &self.config
    }

    fn encode(&self, packet: RadioPacket) -> Result<Vec<u8>, MqttError> {
        let packet = packet.with_sender(&self.config.client_id);
        debug!(topic = %self.config.topic, ?packet, "radio send");
        serde_json::to_vec(&packet).map_err(|e| MqttError::Publish(e.to_string()))
    }

    fn publish(&mut self, packet: RadioPacket) -> Result<(), MqttError> {
        let payload = self.encode(packet)?;
        self.client
            .try_publish(self.config.topic.as_str(), QoS::AtMostOnce, false, payload)
            .map_err(|e| MqttError::Publish(e.to_string()))
    }
}

impl RadioTransport for MqttRadio {
    type Error = MqttError;

    fn send(&mut self, msg: &CallMessage, shape: SendShape) -> Result<(), Self::Error> {
        self.publish(RadioPacket::from_message(msg, shape))
    }

    fn send_string(&mut self, label: &str) -> Result<(), Self::Error> {
        self.publish(RadioPacket::text(label))
    }

    fn send_number(&mut self, value: i32) -> Result<(), Self::Error> {
        self.publish(RadioPacket::number(value))
    }

    fn send_value(&mut self, label: &str, value: i32) -> Result<(), Self::Error> {
        self.publish(RadioPacket::combined(label, value))
    }

    fn try_recv(&mut self) -> Option<CallMessage> {
        self.incoming.try_recv().ok().map(|packet| packet.to_message())
    }
}

/// Decode an inbound payload, dropping malformed packets and our own echoes.
pub fn decode_payload(payload: &[u8], own_id: &str) -> Option<RadioPacket> {
    match serde_json::from_slice::<RadioPacket>(payload) {
        Ok(packet) if packet.is_from(own_id) => None,
        Ok(packet) => Some(packet),
        Err(e) => {
            warn!(error = %e, "dropping malformed radio packet");
            None
        }
    }
}

/// Re-subscribe to `topic` unless the broker kept our session.
///
/// Returns whether a subscribe request was queued.
fn resubscribe(client: &AsyncClient, topic: &str, ack: &ConnAck) -> Result<bool, MqttError> {
    if ack.session_present {
        return Ok(false);
    }
    client
        .try_subscribe(topic, QoS::AtMostOnce)
        .map_err(|e| MqttError::Subscribe(e.to_string()))?;
    Ok(true)
}

async fn run_eventloop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    tx: mpsc::Sender<RadioPacket>,
    own_id: String,
    topic: String,
) {
    // The first subscribe is queued by `connect`
    let mut reconnect = false;
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Some(packet) = decode_payload(&publish.payload, &own_id) else {
                    continue;
                };
                match tx.try_send(packet) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!("inbound radio queue full, dropping packet");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        debug!("radio dropped, stopping event loop");
                        return;
                    }
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(session_present = ack.session_present, "MQTT connected");
                if reconnect {
                    match resubscribe(&client, &topic, &ack) {
                        Ok(true) => info!(topic = %topic, "MQTT radio re-subscribed"),
                        Ok(false) => {}
                        Err(e) => warn!(error = %e, "MQTT re-subscribe failed"),
                    }
                }
                reconnect = true;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = ?e, "MQTT connection error");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

/// MQTT-related errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MqttError {
    /// Failed to subscribe to topic
    Subscribe(String),
    /// Failed to publish message
    Publish(String),
}

impl std::fmt::Display for MqttError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MqttError::Subscribe(e) => write!(f, "MQTT subscribe error: {}", e),
            MqttError::Publish(e) => write!(f, "MQTT publish error: {}", e),
        }
    }
}

impl std::error::Error for MqttError {}
