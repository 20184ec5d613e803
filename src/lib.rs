//! # microbit-cop
//!
//! The call-panel (COP) controller of a micro:bit elevator simulation. One
//! panel sits on each floor, sends up/down call requests over a shared radio
//! channel, and lights its indicators once the elevator controller
//! acknowledges them.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for buttons, audio, radio, and the LED matrix
//! - **Call protocol**: `CP<floor>call` requests, `ACK<floor>call` acknowledgments, `±1` direction values
//! - **Signal normalization**: Any number is clamped to a direction before it is sent
//! - **Pure rendering**: Indicator output is computed from state, then applied to the display
//! - **Radio bridge**: Run panels on a desktop with the radio carried over MQTT (`mqtt` feature)
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions
//! - `direction` - Direction codes and the signal normalizer
//! - `protocol` - Label codec for calls and acknowledgments
//! - `state` - Per-panel state
//! - `indicator` - State to LED commands
//! - `panel` - Main controller that ties everything together
//! - `hal` - Concrete implementations (mock for testing, console for desktop)
//!
//! ## Example
//!
//! ```rust
//! use microbit_cop::{
//!     CallPanel, Config, Direction, PanelOutcome,
//!     hal::{MockAudio, MockDisplay, MockRadio},
//! };
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
//! // Ask for the elevator to come up
//! let sent = panel.request(Direction::Up).unwrap();
//! assert_eq!((sent.label(), sent.value()), ("CP1call", 1));
//!
//! // The controller acknowledges
//! let outcome = panel.on_receive("ACK1call", 1).unwrap();
//! assert_eq!(
//!     outcome,
//!     PanelOutcome::Acknowledged { floor: Some(1), direction: Some(Direction::Up) }
//! );
//! assert!(panel.state().pending.up);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Shared configuration for desktop and micro:bit builds.
pub mod config;
/// Call directions and the signal normalizer.
pub mod direction;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Pure mapping from panel state to LED commands.
pub mod indicator;
/// Main call panel that coordinates input, radio, and display.
pub mod panel;
/// Call and acknowledgment label codec.
pub mod protocol;
/// Per-panel state.
pub mod state;
/// Core traits for hardware abstraction.
pub mod traits;

/// JSON shape of radio datagrams (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

/// Network services for the MQTT radio bridge (feature-gated).
#[cfg(feature = "mqtt")]
pub mod services;

// Re-exports for convenience
pub use direction::{normalize, Direction, Fallback};
pub use indicator::{IndicatorLayout, LedPosition, RenderCommand};
pub use panel::{CallPanel, PanelError, PanelEvent, PanelOutcome, PanelResult};
pub use protocol::{CallCodec, CallMessage, Decoded};
pub use state::{CallPanelState, PanelStatus, PendingCalls};
pub use traits::{
    AudioCue, AudioOutput, Button, ButtonInput, IndicatorDisplay, RadioTransport, SendShape,
};

// Config re-exports
pub use config::{BehaviorConfig, Config, ConfigError, MqttConfig, PanelConfig, ProtocolConfig};

// Message re-exports (for the radio bridge)
#[cfg(feature = "serde")]
pub use messages::RadioPacket;

#[cfg(feature = "serde-json-core")]
pub use messages::{parse_radio_packet, write_radio_packet};
