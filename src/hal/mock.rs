//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware traits, enabling
//! development and testing on desktop without a micro:bit.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockButtons`] | [`ButtonInput`] | Queued button presses |
//! | [`MockRadio`] | [`RadioTransport`] | Records sends, queues receptions |
//! | [`MockAudio`] | [`AudioOutput`] | Records played cues |
//! | [`MockDisplay`] | [`IndicatorDisplay`] | 5x5 LED model plus draw log |
//!
//! # Example
//!
//! ```rust
//! use microbit_cop::{CallPanel, Config};
//! use microbit_cop::hal::{MockAudio, MockDisplay, MockRadio};
//! use microbit_cop::traits::Button;
//!
//! let mut panel = CallPanel::new(
//!     MockRadio::new(),
//!     MockAudio::new(),
//!     MockDisplay::new(),
//!     &Config::default(),
//! )
//! .unwrap();
//!
//! panel.on_press(Button::B).unwrap();
//!
//! // Verify via the mocks
//! assert_eq!(panel.radio().sent.len(), 1);
//! assert_eq!(panel.radio().sent[0].label.as_deref(), Some("CP1call"));
//! assert_eq!(panel.audio().played.len(), 1);
//! ```
//!
//! [`ButtonInput`]: crate::traits::ButtonInput
//! [`RadioTransport`]: crate::traits::RadioTransport
//! [`AudioOutput`]: crate::traits::AudioOutput
//! [`IndicatorDisplay`]: crate::traits::IndicatorDisplay

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::indicator::LedPosition;
use crate::protocol::CallMessage;
use crate::traits::{
    AudioCue, AudioOutput, Button, ButtonInput, IndicatorDisplay, RadioTransport, SendShape,
};

/// Width and height of the LED matrix.
pub const MATRIX_SIZE: usize = 5;

// ============================================================================
// Input Mocks
// ============================================================================

/// Mock button input for testing.
///
/// Presses come out in the order they were queued.
///
/// # Example
///
/// ```rust
/// use microbit_cop::hal::MockButtons;
/// use microbit_cop::traits::{Button, ButtonInput};
///
/// let mut buttons = MockButtons::new();
/// buttons.press(Button::A);
/// buttons.press(Button::B);
///
/// assert_eq!(buttons.poll_press(), Some(Button::A));
/// assert_eq!(buttons.poll_press(), Some(Button::B));
/// assert_eq!(buttons.poll_press(), None); // Empty
/// ```
#[derive(Debug, Default)]
pub struct MockButtons {
    presses: Vec<Button>,
}

impl MockButtons {
    /// Creates a new mock with no queued presses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a press
    pub fn press(&mut self, button: Button) {
        self.presses.push(button);
    }

    /// Queue several presses
    pub fn press_all(&mut self, buttons: &[Button]) {
        self.presses.extend_from_slice(buttons);
    }

    /// Number of presses not yet polled
    pub fn pending(&self) -> usize {
        self.presses.len()
    }
}

impl ButtonInput for MockButtons {
    fn poll_press(&mut self) -> Option<Button> {
        if self.presses.is_empty() {
            None
        } else {
            Some(self.presses.remove(0))
        }
    }
}

// ============================================================================
// Radio Mock
// ============================================================================

/// One datagram as the mock radio saw it go out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentDatagram {
    /// Which send method was used.
    pub shape: SendShape,
    /// Label, if the shape carries one.
    pub label: Option<String>,
    /// Value, if the shape carries one.
    pub value: Option<i32>,
}

/// Mock radio for testing.
///
/// Records every send and returns queued messages from `try_recv()` in
/// FIFO order.
///
/// # Example
///
/// ```rust
/// use microbit_cop::hal::MockRadio;
/// use microbit_cop::traits::RadioTransport;
///
/// let mut radio = MockRadio::new();
/// radio.queue_incoming("ACK1call", 1);
///
/// let msg = radio.try_recv().unwrap();
/// assert_eq!(msg.label(), "ACK1call");
/// assert!(radio.try_recv().is_none());
///
/// radio.send_value("CP1call", -1).unwrap();
/// assert_eq!(radio.sent_values(), vec![("CP1call", -1)]);
/// ```
#[derive(Debug, Default)]
pub struct MockRadio {
    /// Datagrams sent so far.
    pub sent: Vec<SentDatagram>,
    /// Queue of messages to be returned by `try_recv()`.
    pub incoming: Vec<CallMessage>,
    /// When set, every send fails with `Err(())`.
    pub fail_sends: bool,
}

impl MockRadio {
    /// Creates a new mock radio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an incoming datagram
    pub fn queue_incoming(&mut self, label: &str, value: i32) {
        self.incoming.push(CallMessage::new(label, value));
    }

    /// Combined-shape sends as `(label, value)` pairs
    pub fn sent_values(&self) -> Vec<(&str, i32)> {
        self.sent
            .iter()
            .filter(|d| d.shape == SendShape::Combined)
            .filter_map(|d| Some((d.label.as_deref()?, d.value?)))
            .collect()
    }

    fn record(
        &mut self,
        shape: SendShape,
        label: Option<&str>,
        value: Option<i32>,
    ) -> Result<(), ()> {
        if self.fail_sends {
            return Err(());
        }
        self.sent.push(SentDatagram {
            shape,
            label: label.map(Into::into),
            value,
        });
        Ok(())
    }
}

impl RadioTransport for MockRadio {
    type Error = ();

    fn send_string(&mut self, label: &str) -> Result<(), ()> {
        self.record(SendShape::Text, Some(label), None)
    }

    fn send_number(&mut self, value: i32) -> Result<(), ()> {
        self.record(SendShape::Number, None, Some(value))
    }

    fn send_value(&mut self, label: &str, value: i32) -> Result<(), ()> {
        self.record(SendShape::Combined, Some(label), Some(value))
    }

    fn try_recv(&mut self) -> Option<CallMessage> {
        if self.incoming.is_empty() {
            None
        } else {
            Some(self.incoming.remove(0))
        }
    }
}

// ============================================================================
// Audio Mock
// ============================================================================

/// Mock audio output for testing.
#[derive(Debug, Default)]
pub struct MockAudio {
    /// Cues played, in order.
    pub played: Vec<AudioCue>,
    /// When set, `play` fails with `Err(())`.
    pub fail: bool,
}

impl MockAudio {
    /// Creates a new mock audio output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the cues played, in order
    pub fn played_names(&self) -> Vec<&'static str> {
        self.played.iter().map(|cue| cue.name()).collect()
    }
}

impl AudioOutput for MockAudio {
    type Error = ();

    fn play(&mut self, cue: AudioCue) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.played.push(cue);
        Ok(())
    }
}

// ============================================================================
// Display Mock
// ============================================================================

/// A single draw call seen by [`MockDisplay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    /// `clear()`
    Clear,
    /// `plot(at)`
    Plot(LedPosition),
    /// `unplot(at)`
    Unplot(LedPosition),
    /// `show_message(text)`
    Message(String),
}

/// Mock display for testing indicator rendering.
///
/// Keeps a model of the 5x5 matrix and logs every draw call.
///
/// # Example
///
/// ```
/// use microbit_cop::hal::MockDisplay;
/// use microbit_cop::indicator::LedPosition;
/// use microbit_cop::traits::IndicatorDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
///
/// let centre = LedPosition::new(2, 2);
/// display.plot(centre).unwrap();
/// assert!(display.is_lit(centre));
///
/// display.unplot(centre).unwrap();
/// assert!(!display.is_lit(centre));
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// LED state, indexed `[y][x]`.
    pub leds: [[bool; MATRIX_SIZE]; MATRIX_SIZE],
    /// Every draw call, in order.
    pub draws: Vec<DrawCall>,
    /// Every message shown.
    pub messages: Vec<String>,
    /// Whether init() was called.
    pub initialized: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the LED at `at` is currently lit. Off-matrix positions are
    /// never lit.
    pub fn is_lit(&self, at: LedPosition) -> bool {
        self.leds
            .get(at.y as usize)
            .and_then(|row| row.get(at.x as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Number of lit LEDs.
    pub fn lit_count(&self) -> usize {
        self.leds.iter().flatten().filter(|&&lit| lit).count()
    }

    fn set(&mut self, at: LedPosition, lit: bool) {
        if let Some(led) = self
            .leds
            .get_mut(at.y as usize)
            .and_then(|row| row.get_mut(at.x as usize))
        {
            *led = lit;
        }
    }
}

impl IndicatorDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.leds = Default::default();
        self.draws.push(DrawCall::Clear);
        Ok(())
    }

    fn plot(&mut self, at: LedPosition) -> Result<(), ()> {
        self.set(at, true);
        self.draws.push(DrawCall::Plot(at));
        Ok(())
    }

    fn unplot(&mut self, at: LedPosition) -> Result<(), ()> {
        self.set(at, false);
        self.draws.push(DrawCall::Unplot(at));
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<(), ()> {
        self.messages.push(text.into());
        self.draws.push(DrawCall::Message(text.into()));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
