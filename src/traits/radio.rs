//! Radio transport abstraction.
//!
//! Panels and the elevator controller share one broadcast channel. Each
//! datagram carries a text label, a number, or both:
//!
//! ```text
//! send_string("CP1call")        label only
//! send_number(-1)               value only
//! send_value("CP1call", -1)     label and value (the default shape)
//! ```
//!
//! Delivery is at most once, unordered, and may not happen at all. The core
//! never waits for or retries a send.

use crate::protocol::CallMessage;

/// Which parts of a [`CallMessage`] a send carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SendShape {
    /// Label only.
    Text,
    /// Value only.
    Number,
    /// Label and value.
    #[default]
    Combined,
}

/// Radio transport trait.
///
/// Uses the same **sync-first design** as the rest of the hardware traits:
/// sends return immediately and `try_recv` never blocks, which suits both a
/// callback-driven microcontroller and a polling desktop loop.
///
/// # Example
///
/// ```rust
/// use microbit_cop::hal::MockRadio;
/// use microbit_cop::protocol::CallMessage;
/// use microbit_cop::traits::{RadioTransport, SendShape};
///
/// let mut radio = MockRadio::new();
/// let msg = CallMessage::new("CP1call", 1);
///
/// radio.send(&msg, SendShape::Combined).unwrap();
/// assert_eq!(radio.sent.len(), 1);
/// ```
pub trait RadioTransport {
    /// Error type for radio operations.
    type Error;

    /// Broadcasts a label with no value.
    fn send_string(&mut self, label: &str) -> Result<(), Self::Error>;

    /// Broadcasts a value with no label.
    fn send_number(&mut self, value: i32) -> Result<(), Self::Error>;

    /// Broadcasts a label and a value together.
    fn send_value(&mut self, label: &str, value: i32) -> Result<(), Self::Error>;

    /// Returns the next received datagram, if any. Must not block.
    ///
    /// Datagrams without a label arrive with an empty label; datagrams
    /// without a value arrive with value `0`.
    fn try_recv(&mut self) -> Option<CallMessage>;

    /// Broadcasts `msg` in the given shape.
    fn send(&mut self, msg: &CallMessage, shape: SendShape) -> Result<(), Self::Error> {
        match shape {
            SendShape::Text => self.send_string(msg.label()),
            SendShape::Number => self.send_number(msg.value()),
            SendShape::Combined => self.send_value(msg.label(), msg.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestRadio {
        strings: usize,
        numbers: usize,
        values: usize,
    }

    impl RadioTransport for TestRadio {
        type Error = ();

        fn send_string(&mut self, _label: &str) -> Result<(), ()> {
            self.strings += 1;
            Ok(())
        }

        fn send_number(&mut self, _value: i32) -> Result<(), ()> {
            self.numbers += 1;
            Ok(())
        }

        fn send_value(&mut self, _label: &str, _value: i32) -> Result<(), ()> {
            self.values += 1;
            Ok(())
        }

        fn try_recv(&mut self) -> Option<CallMessage> {
            None
        }
    }

    #[test]
    fn send_dispatches_on_shape() {
        let mut radio = TestRadio::default();
        let msg = CallMessage::new("CP1call", -1);

        radio.send(&msg, SendShape::Text).unwrap();
        radio.send(&msg, SendShape::Number).unwrap();
        radio.send(&msg, SendShape::Combined).unwrap();
        radio.send(&msg, SendShape::default()).unwrap();

        assert_eq!(radio.strings, 1);
        assert_eq!(radio.numbers, 1);
        assert_eq!(radio.values, 2);
    }

    #[test]
    fn default_shape_is_combined() {
        assert_eq!(SendShape::default(), SendShape::Combined);
    }
}
