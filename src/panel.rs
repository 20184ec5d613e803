//! Main call-panel controller that ties everything together.
//!
//! This module provides [`CallPanel`], which owns the panel state and the
//! hardware adapters and handles one event at a time.
//!
//! # Overview
//!
//! The panel:
//! - Turns button presses into call messages and broadcasts them
//! - Plays the click cue on every press
//! - Matches inbound acknowledgments and updates the pending flags
//! - Re-renders the indicators after each acknowledgment
//!
//! Every handler takes `&mut self` and runs to completion, so a press and a
//! receive can never interleave.
//!
//! # Example
//!
//! ```rust
//! use microbit_cop::{CallPanel, Config, PanelOutcome};
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
//! panel.start().unwrap();
//!
//! // Down button
//! let sent = panel.on_press(Button::A).unwrap();
//! assert_eq!(sent.label(), "CP1call");
//! assert_eq!(sent.value(), -1);
//!
//! // Elevator acknowledges
//! let outcome = panel.on_receive("ACK1call", -1).unwrap();
//! assert!(matches!(outcome, PanelOutcome::Acknowledged { .. }));
//! assert!(panel.state().pending.down);
//! ```

use tracing::{debug, info};

use crate::config::{BehaviorConfig, Config, ConfigError};
use crate::direction::Direction;
use crate::indicator::{self, RenderCommand};
use crate::protocol::{CallCodec, CallMessage, Decoded};
use crate::state::{CallPanelState, PanelStatus};
use crate::traits::{
    AudioCue, AudioOutput, Button, ButtonInput, IndicatorDisplay, RadioTransport, SendShape,
};

// ============================================================================
// Errors
// ============================================================================

/// A hardware adapter failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelError<R, A, D> {
    /// The radio rejected a send.
    Radio(R),
    /// The audio output failed.
    Audio(A),
    /// The display failed.
    Display(D),
}

impl<R: core::fmt::Debug, A: core::fmt::Debug, D: core::fmt::Debug> core::fmt::Display
    for PanelError<R, A, D>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PanelError::Radio(e) => write!(f, "radio error: {e:?}"),
            PanelError::Audio(e) => write!(f, "audio error: {e:?}"),
            PanelError::Display(e) => write!(f, "display error: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<R, A, D> std::error::Error for PanelError<R, A, D>
where
    R: core::fmt::Debug,
    A: core::fmt::Debug,
    D: core::fmt::Debug,
{
}

/// Result of a panel operation over adapters `R`, `A`, `D`.
pub type PanelResult<T, R, A, D> = Result<
    T,
    PanelError<
        <R as RadioTransport>::Error,
        <A as AudioOutput>::Error,
        <D as IndicatorDisplay>::Error,
    >,
>;

// ============================================================================
// Events and Outcomes
// ============================================================================

/// Something the panel has to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// A button was pressed.
    Pressed(Button),
    /// A datagram arrived.
    Received(CallMessage),
}

/// What handling an event did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelOutcome {
    /// A call was encoded and sent.
    CallSent(CallMessage),
    /// An acknowledgment matched.
    ///
    /// `direction` is `None` when the value did not normalize, in which case
    /// no flag changed.
    Acknowledged {
        /// Floor named in the label. Not checked against this panel.
        floor: Option<u16>,
        /// Acknowledged direction.
        direction: Option<Direction>,
    },
    /// The message was stored as last received and otherwise ignored.
    Ignored,
}

// ============================================================================
// Call Panel
// ============================================================================

/// Call-panel controller.
///
/// # Type Parameters
///
/// - `R`: Radio transport ([`RadioTransport`])
/// - `A`: Audio output ([`AudioOutput`])
/// - `D`: LED display ([`IndicatorDisplay`])
///
/// # Thread Safety
///
/// The panel is not thread-safe. When the radio runs on an async runtime,
/// wrap it in `SharedPanel` from the services module (requires the `mqtt`
/// feature).
pub struct CallPanel<R, A, D>
where
    R: RadioTransport,
    A: AudioOutput,
    D: IndicatorDisplay,
{
    radio: R,
    audio: A,
    display: D,
    codec: CallCodec,
    behavior: BehaviorConfig,
    state: CallPanelState,
}

impl<R, A, D> CallPanel<R, A, D>
where
    R: RadioTransport,
    A: AudioOutput,
    D: IndicatorDisplay,
{
    /// Create a new panel from validated configuration.
    pub fn new(radio: R, audio: A, display: D, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let state =
            CallPanelState::new(config.panel.floor_number).with_status(config.panel.status);

        Ok(Self {
            radio,
            audio,
            display,
            codec: CallCodec::from_config(config),
            behavior: config.behavior.clone(),
            state,
        })
    }

    /// Initialize the display and draw the initial indicators.
    pub fn start(&mut self) -> PanelResult<RenderCommand, R, A, D> {
        self.display.init().map_err(PanelError::Display)?;
        info!(
            floor = self.state.floor_number(),
            status = self.state.status.code(),
            reference_behavior = self.behavior.is_reference(),
            "call panel started"
        );
        self.render()
    }

    // ------------------------------------------------------------------------
    // Local input
    // ------------------------------------------------------------------------

    /// Handle a button press.
    pub fn on_press(&mut self, button: Button) -> PanelResult<CallMessage, R, A, D> {
        self.request(button.direction())
    }

    /// Request a call from a raw numeric signal.
    ///
    /// The signal is normalized first. If it does not normalize to a
    /// direction (only possible with [`Fallback::PassThrough`]), nothing is
    /// sent and `Ok(None)` is returned.
    ///
    /// [`Fallback::PassThrough`]: crate::direction::Fallback::PassThrough
    pub fn call_signal(&mut self, signal: f64) -> PanelResult<Option<CallMessage>, R, A, D> {
        match self.codec.fallback().direction(signal) {
            Some(direction) => self.request(direction).map(Some),
            None => {
                debug!(signal, "signal did not normalize to a direction, not sent");
                Ok(None)
            }
        }
    }

    /// Mark `direction` pending, broadcast the call, and play the click.
    ///
    /// Repeated requests are not suppressed: every call re-sends.
    pub fn request(&mut self, direction: Direction) -> PanelResult<CallMessage, R, A, D> {
        self.state.pending.set(direction, true);
        self.state.send_buffer = self
            .codec
            .encode_call(self.state.floor_number(), direction);

        self.radio
            .send(&self.state.send_buffer, SendShape::Combined)
            .map_err(PanelError::Radio)?;
        debug!(
            label = self.state.send_buffer.label(),
            value = self.state.send_buffer.value(),
            "call sent"
        );

        self.audio
            .play(AudioCue::ButtonClick)
            .map_err(PanelError::Audio)?;

        if self.behavior.render_on_press {
            self.render()?;
        }

        Ok(self.state.send_buffer.clone())
    }

    // ------------------------------------------------------------------------
    // Radio input
    // ------------------------------------------------------------------------

    /// Handle a received `(label, value)` datagram.
    ///
    /// Matching runs on the full label; only the stored copy in
    /// `last_received` is bounded.
    pub fn on_receive(&mut self, label: &str, value: i32) -> PanelResult<PanelOutcome, R, A, D> {
        let decoded = self.codec.decode_label(label, value);
        self.state.last_received = Some(CallMessage::new(label, value));
        self.apply_decoded(decoded)
    }

    /// Handle a received message.
    ///
    /// The message always replaces `last_received`. Only acknowledgments
    /// change anything else; the floor in the label is not checked.
    pub fn receive(&mut self, msg: CallMessage) -> PanelResult<PanelOutcome, R, A, D> {
        let decoded = self.codec.decode(&msg);
        self.state.last_received = Some(msg);
        self.apply_decoded(decoded)
    }

    fn apply_decoded(&mut self, decoded: Decoded) -> PanelResult<PanelOutcome, R, A, D> {
        match decoded {
            Decoded::CallAck { floor, direction } => {
                if let Some(direction) = direction {
                    let pending = !self.behavior.clear_on_ack;
                    self.state.pending.set(direction, pending);
                    info!(
                        floor,
                        direction = direction.as_str(),
                        pending,
                        "call acknowledged"
                    );
                } else {
                    debug!(floor, "acknowledgment without a direction");
                }
                self.render()?;
                Ok(PanelOutcome::Acknowledged { floor, direction })
            }
            other => {
                debug!(decoded = ?other, "message ignored");
                Ok(PanelOutcome::Ignored)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------------

    /// Handle one event.
    pub fn handle(&mut self, event: PanelEvent) -> PanelResult<PanelOutcome, R, A, D> {
        match event {
            PanelEvent::Pressed(button) => self.on_press(button).map(PanelOutcome::CallSent),
            PanelEvent::Received(msg) => self.receive(msg),
        }
    }

    /// Next pending event, presses first.
    pub fn next_event<I: ButtonInput>(&mut self, input: &mut I) -> Option<PanelEvent> {
        input
            .poll_press()
            .map(PanelEvent::Pressed)
            .or_else(|| self.radio.try_recv().map(PanelEvent::Received))
    }

    /// Handle at most one pending event. Call this from the main loop.
    pub fn poll<I: ButtonInput>(
        &mut self,
        input: &mut I,
    ) -> PanelResult<Option<PanelOutcome>, R, A, D> {
        match self.next_event(input) {
            Some(event) => self.handle(event).map(Some),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------------
    // Rendering and status
    // ------------------------------------------------------------------------

    /// Render the indicators and push them to the display.
    pub fn render(&mut self) -> PanelResult<RenderCommand, R, A, D> {
        let cmd = indicator::render(&self.state, &self.behavior.layout);
        self.display.apply(&cmd).map_err(PanelError::Display)?;
        Ok(cmd)
    }

    /// Change the operating status and re-render.
    pub fn set_status(&mut self, status: PanelStatus) -> PanelResult<RenderCommand, R, A, D> {
        if self.state.status != status {
            info!(status = status.code(), "panel status changed");
        }
        self.state.status = status;
        self.render()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Current panel state.
    pub fn state(&self) -> &CallPanelState {
        &self.state
    }

    /// The codec used for this panel's labels.
    pub fn codec(&self) -> &CallCodec {
        &self.codec
    }

    /// Active behavior flags.
    pub fn behavior(&self) -> &BehaviorConfig {
        &self.behavior
    }

    /// The radio transport.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Mutable access to the radio transport.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// The audio output.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Mutable access to the audio output.
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// The display.
    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::hal::{MockAudio, MockButtons, MockDisplay, MockRadio};

    type TestPanel = CallPanel<MockRadio, MockAudio, MockDisplay>;

    fn panel() -> TestPanel {
        panel_with(&Config::default())
    }

    fn panel_with(config: &Config) -> TestPanel {
        CallPanel::new(
            MockRadio::new(),
            MockAudio::new(),
            MockDisplay::new(),
            config,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = Config::default().with_panel(PanelConfig::default().with_floor_number(0));
        let result = CallPanel::new(
            MockRadio::new(),
            MockAudio::new(),
            MockDisplay::new(),
            &config,
        );
        assert!(matches!(result, Err(ConfigError::ZeroFloor)));
    }

    #[test]
    fn start_initializes_and_renders() {
        let mut p = panel();
        let cmd = p.start().unwrap();
        assert!(p.display().initialized);
        assert_eq!(p.display().draws.len(), 2);
        assert!(matches!(cmd, RenderCommand::Indicators(_)));
    }

    #[test]
    fn press_sets_pending_and_fills_send_buffer() {
        let mut p = panel();
        let sent = p.on_press(Button::B).unwrap();

        assert!(p.state().pending.up);
        assert!(!p.state().pending.down);
        assert_eq!(p.state().send_buffer, sent);
        assert_eq!(sent, CallMessage::new("CP1call", 1));
    }

    #[test]
    fn press_uses_combined_shape() {
        let mut p = panel();
        p.on_press(Button::A).unwrap();
        assert_eq!(p.radio().sent.len(), 1);
        assert_eq!(p.radio().sent[0].shape, SendShape::Combined);
    }

    #[test]
    fn press_does_not_render_by_default() {
        let mut p = panel();
        p.on_press(Button::A).unwrap();
        assert!(p.display().draws.is_empty());
    }

    #[test]
    fn call_signal_normalizes() {
        let mut p = panel();
        let sent = p.call_signal(7.5).unwrap();
        assert_eq!(sent.map(|m| m.value()), Some(1));

        let sent = p.call_signal(-3.0).unwrap();
        assert_eq!(sent.map(|m| m.value()), Some(-1));
    }

    #[test]
    fn call_signal_in_band_sends_nothing() {
        let mut p = panel();
        assert_eq!(p.call_signal(0.0).unwrap(), None);
        assert!(p.radio().sent.is_empty());
        assert!(p.audio().played.is_empty());
        assert!(p.state().pending.is_idle());
    }

    #[test]
    fn receive_stores_last_received() {
        let mut p = panel();
        let outcome = p.on_receive("hello", 3).unwrap();
        assert_eq!(outcome, PanelOutcome::Ignored);
        assert_eq!(
            p.state().last_received,
            Some(CallMessage::new("hello", 3))
        );
        assert!(p.state().pending.is_idle());
    }

    #[test]
    fn other_panels_calls_are_ignored() {
        let mut p = panel();
        assert_eq!(p.on_receive("CP2call", 1).unwrap(), PanelOutcome::Ignored);
        assert!(p.state().pending.is_idle());
        assert!(p.display().draws.is_empty());
    }

    #[test]
    fn ack_without_direction_renders_but_changes_nothing() {
        let mut p = panel();
        let outcome = p.on_receive("ACK1call", 0).unwrap();
        assert_eq!(
            outcome,
            PanelOutcome::Acknowledged {
                floor: Some(1),
                direction: None,
            }
        );
        assert!(p.state().pending.is_idle());
        assert_eq!(p.display().draws.len(), 2);
    }

    #[test]
    fn clear_on_ack_resets_flag() {
        let config = Config::default()
            .with_behavior(BehaviorConfig::default().with_clear_on_ack(true));
        let mut p = panel_with(&config);

        p.on_press(Button::B).unwrap();
        assert!(p.state().pending.up);

        p.on_receive("ACK1call", 1).unwrap();
        assert!(!p.state().pending.up);
    }

    #[test]
    fn set_status_renders_fault() {
        let mut p = panel();
        let cmd = p.set_status(PanelStatus::OutOfOrder).unwrap();
        assert_eq!(cmd, RenderCommand::Fault("OUT OF ORDER"));
        assert_eq!(p.display().messages, vec!["OUT OF ORDER".to_string()]);
    }

    #[test]
    fn poll_prefers_presses() {
        let mut p = panel();
        let mut buttons = MockButtons::new();
        buttons.press(Button::A);
        p.radio_mut().queue_incoming("ACK1call", 1);

        let first = p.poll(&mut buttons).unwrap();
        assert!(matches!(first, Some(PanelOutcome::CallSent(_))));

        let second = p.poll(&mut buttons).unwrap();
        assert!(matches!(second, Some(PanelOutcome::Acknowledged { .. })));

        assert_eq!(p.poll(&mut buttons).unwrap(), None);
    }

    #[test]
    fn radio_error_propagates() {
        let mut p = panel();
        p.radio_mut().fail_sends = true;

        let err = p.on_press(Button::A).unwrap_err();
        assert_eq!(err, PanelError::Radio(()));
        // Flag and buffer were updated before the send failed
        assert!(p.state().pending.down);
        assert!(p.audio().played.is_empty());
    }

    #[test]
    fn panel_error_display() {
        let err: PanelError<(), (), ()> = PanelError::Display(());
        assert_eq!(err.to_string(), "display error: ()");
    }
}
