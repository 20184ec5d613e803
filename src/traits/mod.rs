//! Trait definitions for the hardware a call panel talks to.
//!
//! The core never touches pins, radios, or speakers directly. It talks to
//! these traits, so the same panel logic runs on a micro:bit, on a desktop
//! with an MQTT-backed radio, or in tests against the mocks in
//! [`crate::hal::mock`].
//!
//! # Submodules
//!
//! - `hardware`: Buttons and audio
//! - `radio`: Datagram transport for call messages
//! - `display`: LED matrix for indicators and fault text
//!
//! # Key Traits
//!
//! - [`ButtonInput`]: Edge-triggered A/B button presses
//! - [`AudioOutput`]: Plays audio cues
//! - [`RadioTransport`]: Sends and receives `(label, value)` datagrams
//! - [`IndicatorDisplay`]: Lights LEDs and shows messages

pub mod display;
pub mod hardware;
pub mod radio;

pub use display::*;
pub use hardware::*;
pub use radio::*;
