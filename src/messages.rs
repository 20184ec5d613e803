//! JSON shape of a radio datagram, for bridging the radio over a network.
//!
//! These types are `no_std` compatible and can be (de)serialized using either
//! `serde_json` (desktop) or `serde-json-core` (embedded).
//!
//! # JSON Examples
//!
//! ```json
//! {"label": "CP1call", "value": -1, "sender": "cop-1"}   combined
//! {"label": "CP1call"}                                   text only
//! {"value": -1}                                          number only
//! ```
//!
//! # Example
//!
//! ```
//! use microbit_cop::messages::RadioPacket;
//!
//! // Desktop: using serde_json
//! #[cfg(feature = "mqtt")]
//! {
//!     let json = r#"{"label": "ACK1call", "value": 1}"#;
//!     let packet: RadioPacket = serde_json::from_str(json).unwrap();
//!     assert_eq!(packet.to_message().label(), "ACK1call");
//! }
//!
//! // Embedded: using serde-json-core
//! #[cfg(feature = "serde-json-core")]
//! {
//!     let json = br#"{"label": "ACK1call", "value": 1}"#;
//!     let (packet, _): (RadioPacket, _) = serde_json_core::from_slice(json).unwrap();
//!     assert_eq!(packet.value, Some(1));
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{long_string, short_string, LongString, ShortString};
use crate::protocol::CallMessage;
use crate::traits::SendShape;

/// One datagram on the bridged radio channel.
///
/// Missing parts mirror the send shape: a text-only send has no `value`, a
/// number-only send has no `label`. `sender` lets a node drop its own
/// echoes; real radios never deliver a node's own packets back to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RadioPacket {
    /// Label text, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LongString>,
    /// Numeric value, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    /// Identity of the sending node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<ShortString>,
}

impl RadioPacket {
    /// A label-only packet.
    pub fn text(label: &str) -> Self {
        Self {
            label: Some(long_string(label)),
            ..Default::default()
        }
    }

    /// A value-only packet.
    pub fn number(value: i32) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// A label-and-value packet.
    pub fn combined(label: &str, value: i32) -> Self {
        Self {
            label: Some(long_string(label)),
            value: Some(value),
            sender: None,
        }
    }

    /// Packs `msg` in the given shape.
    pub fn from_message(msg: &CallMessage, shape: SendShape) -> Self {
        match shape {
            SendShape::Text => Self::text(msg.label()),
            SendShape::Number => Self::number(msg.value()),
            SendShape::Combined => Self::combined(msg.label(), msg.value()),
        }
    }

    /// Tags the packet with its sender.
    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = Some(short_string(sender));
        self
    }

    /// True if this packet was sent by `id`.
    pub fn is_from(&self, id: &str) -> bool {
        self.sender.as_deref() == Some(id)
    }

    /// The message as a panel receives it: missing label is empty, missing
    /// value is `0`.
    pub fn to_message(&self) -> CallMessage {
        CallMessage::new(
            self.label.as_deref().unwrap_or_default(),
            self.value.unwrap_or(0),
        )
    }
}

// ============================================================================
// Encoding Functions (using serde-json-core for no_std compatibility)
// ============================================================================

/// Parse a radio packet from JSON bytes.
///
/// Returns `None` for anything that is not a well-formed packet.
///
/// # Example
///
/// ```
/// use microbit_cop::messages::parse_radio_packet;
///
/// let packet = parse_radio_packet(br#"{"label": "CP2call", "value": 1}"#).unwrap();
/// assert_eq!(packet.label.as_deref(), Some("CP2call"));
/// assert_eq!(packet.value, Some(1));
///
/// assert!(parse_radio_packet(b"not json").is_none());
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_radio_packet(json: &[u8]) -> Option<RadioPacket> {
    serde_json_core::from_slice(json).ok().map(|(packet, _)| packet)
}

/// Write a radio packet as JSON into `buf`, returning the length written.
///
/// Returns `None` if `buf` is too small.
#[cfg(feature = "serde-json-core")]
pub fn write_radio_packet(packet: &RadioPacket, buf: &mut [u8]) -> Option<usize> {
    serde_json_core::to_slice(packet, buf).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_shapes() {
        let msg = CallMessage::new("CP1call", -1);

        let text = RadioPacket::from_message(&msg, SendShape::Text);
        assert_eq!(text.label.as_deref(), Some("CP1call"));
        assert_eq!(text.value, None);

        let number = RadioPacket::from_message(&msg, SendShape::Number);
        assert_eq!(number.label, None);
        assert_eq!(number.value, Some(-1));

        let combined = RadioPacket::from_message(&msg, SendShape::Combined);
        assert_eq!(combined, RadioPacket::combined("CP1call", -1));
    }

    #[test]
    fn packet_to_message_fills_missing_parts() {
        assert_eq!(
            RadioPacket::text("CP1call").to_message(),
            CallMessage::new("CP1call", 0)
        );
        assert_eq!(
            RadioPacket::number(1).to_message(),
            CallMessage::new("", 1)
        );
    }

    #[test]
    fn packet_sender() {
        let packet = RadioPacket::combined("CP1call", 1).with_sender("cop-1");
        assert!(packet.is_from("cop-1"));
        assert!(!packet.is_from("cop-2"));
        assert!(!RadioPacket::number(1).is_from("cop-1"));
    }

    #[cfg(feature = "mqtt")]
    #[test]
    fn packet_serde_skips_missing() {
        let json = serde_json::to_string(&RadioPacket::number(-1)).unwrap();
        assert_eq!(json, r#"{"value":-1}"#);

        let json = serde_json::to_string(&RadioPacket::combined("ACK3call", 1).with_sender("a"))
            .unwrap();
        assert_eq!(json, r#"{"label":"ACK3call","value":1,"sender":"a"}"#);
    }

    #[cfg(feature = "mqtt")]
    #[test]
    fn packet_serde_defaults() {
        let packet: RadioPacket = serde_json::from_str(r#"{"label":"x"}"#).unwrap();
        assert_eq!(packet.value, None);
        assert_eq!(packet.sender, None);
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn packet_json_core_round_trip() {
        let packet = RadioPacket::combined("CP12call", -1).with_sender("cop-12");
        let mut buf = [0u8; 128];
        let len = write_radio_packet(&packet, &mut buf).unwrap();
        assert_eq!(parse_radio_packet(&buf[..len]), Some(packet));
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn packet_json_core_buffer_too_small() {
        let packet = RadioPacket::combined("CP12call", -1);
        let mut buf = [0u8; 4];
        assert_eq!(write_radio_packet(&packet, &mut buf), None);
    }
}
