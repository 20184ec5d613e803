//! Call-signal wire format.
//!
//! Every radio datagram is a `(label, value)` pair. Labels are built by
//! concatenation:
//!
//! ```text
//! <call prefix><floor><suffix>   CP1call   value -1 / +1   call request
//! <ack prefix><floor><suffix>    ACK1call  value -1 / +1   acknowledgment
//! ```
//!
//! Inbound labels are matched by substring containment rather than exact
//! parsing, so floor numbers of any digit width are accepted. The floor is
//! *not* compared against the receiving panel: an acknowledgment for any
//! floor applies to every panel that hears it.
//!
//! # Example
//!
//! ```
//! use microbit_cop::protocol::{CallCodec, Decoded};
//! use microbit_cop::Direction;
//!
//! let codec = CallCodec::default();
//!
//! let call = codec.encode_call(1, Direction::Down);
//! assert_eq!(call.label(), "CP1call");
//! assert_eq!(call.value(), -1);
//!
//! let ack = codec.encode_ack(12, Direction::Up);
//! assert!(codec.matches_ack(&ack));
//! assert_eq!(
//!     codec.decode(&ack),
//!     Decoded::CallAck { floor: Some(12), direction: Some(Direction::Up) }
//! );
//! ```

use core::fmt::Write;

use heapless::String as HString;

use crate::config::{Config, ProtocolConfig, ShortString};
use crate::direction::{Direction, Fallback};

/// Maximum stored label length in bytes. Longer labels are truncated when a
/// message is built. Radio packets carry labels of at most this length.
pub const MAX_LABEL: usize = 128;

/// Bounded label text.
pub type Label = HString<MAX_LABEL>;

/// Pushes as much of `s` as fits, stopping at a char boundary.
fn push_truncated<const N: usize>(dst: &mut HString<N>, s: &str) {
    for c in s.chars() {
        if dst.push(c).is_err() {
            break;
        }
    }
}

// ============================================================================
// Call Message
// ============================================================================

/// One protocol unit: a text label and a numeric value.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CallMessage {
    label: Label,
    value: i32,
}

impl CallMessage {
    /// Builds a message, truncating `label` to [`MAX_LABEL`] bytes.
    pub fn new(label: &str, value: i32) -> Self {
        let mut buf = Label::new();
        push_truncated(&mut buf, label);
        Self { label: buf, value }
    }

    /// The label text.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// The numeric value.
    pub fn value(&self) -> i32 {
        self.value
    }
}

// ============================================================================
// Decoded Message
// ============================================================================

/// Typed view of an inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// The remote system received a call.
    ///
    /// `floor` is `None` when the text between prefix and suffix is not a
    /// number; `direction` is `None` when the value does not normalize to
    /// a direction code.
    CallAck {
        /// Floor parsed from the label, if any.
        floor: Option<u16>,
        /// Acknowledged direction.
        direction: Option<Direction>,
    },
    /// Another panel's call request.
    CallRequest {
        /// Floor parsed from the label, if any.
        floor: Option<u16>,
        /// Requested direction.
        direction: Option<Direction>,
    },
    /// Anything else.
    Unrecognized,
}

// ============================================================================
// Codec
// ============================================================================

/// Builds and recognizes call and acknowledgment messages.
#[derive(Clone, Debug)]
pub struct CallCodec {
    call_prefix: ShortString,
    ack_prefix: ShortString,
    suffix: ShortString,
    fallback: Fallback,
}

impl Default for CallCodec {
    fn default() -> Self {
        Self::new(&ProtocolConfig::default(), Fallback::default())
    }
}

impl CallCodec {
    /// Creates a codec from protocol settings and a normalizer fallback.
    pub fn new(protocol: &ProtocolConfig, fallback: Fallback) -> Self {
        Self {
            call_prefix: protocol.call_prefix.clone(),
            ack_prefix: protocol.ack_prefix.clone(),
            suffix: protocol.suffix.clone(),
            fallback,
        }
    }

    /// Creates a codec from the full configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.protocol, config.behavior.fallback)
    }

    /// The normalizer fallback used when decoding values.
    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    fn build(&self, prefix: &str, floor: u16, value: i32) -> CallMessage {
        let mut label = Label::new();
        push_truncated(&mut label, prefix);
        let _ = write!(label, "{}", floor);
        push_truncated(&mut label, &self.suffix);
        CallMessage { label, value }
    }

    /// Encodes a call request: `<call prefix><floor><suffix>`, value ±1.
    pub fn encode_call(&self, floor: u16, direction: Direction) -> CallMessage {
        self.build(&self.call_prefix, floor, direction.value())
    }

    /// Encodes an acknowledgment: `<ack prefix><floor><suffix>`, value ±1.
    ///
    /// Panels never send this; the elevator controller does.
    pub fn encode_ack(&self, floor: u16, direction: Direction) -> CallMessage {
        self.build(&self.ack_prefix, floor, direction.value())
    }

    /// True if the label contains both the ack prefix and the suffix.
    pub fn matches_ack(&self, msg: &CallMessage) -> bool {
        self.matches_ack_label(msg.label())
    }

    /// [`matches_ack`](Self::matches_ack) on a raw label of any length.
    pub fn matches_ack_label(&self, label: &str) -> bool {
        label.contains(self.ack_prefix.as_str()) && label.contains(self.suffix.as_str())
    }

    /// True if the label contains both the call prefix and the suffix.
    pub fn matches_call(&self, msg: &CallMessage) -> bool {
        self.matches_call_label(msg.label())
    }

    fn matches_call_label(&self, label: &str) -> bool {
        label.contains(self.call_prefix.as_str()) && label.contains(self.suffix.as_str())
    }

    /// Decodes an inbound message. Never fails.
    ///
    /// Acknowledgments are checked first, with exactly the
    /// [`matches_ack`](Self::matches_ack) rule.
    pub fn decode(&self, msg: &CallMessage) -> Decoded {
        self.decode_label(msg.label(), msg.value())
    }

    /// Decodes a raw `(label, value)` pair without bounding the label first.
    pub fn decode_label(&self, label: &str, value: i32) -> Decoded {
        let direction = self.fallback.direction(f64::from(value));

        if self.matches_ack_label(label) {
            Decoded::CallAck {
                floor: floor_between(label, &self.ack_prefix, &self.suffix),
                direction,
            }
        } else if self.matches_call_label(label) {
            Decoded::CallRequest {
                floor: floor_between(label, &self.call_prefix, &self.suffix),
                direction,
            }
        } else {
            Decoded::Unrecognized
        }
    }
}

/// Parses the digits between the first `prefix` and the following `suffix`.
fn floor_between(label: &str, prefix: &str, suffix: &str) -> Option<u16> {
    let start = label.find(prefix)? + prefix.len();
    let rest = &label[start..];
    let end = rest.find(suffix)?;
    rest[..end].parse().ok()
}
