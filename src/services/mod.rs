//! Network services for running a panel off the micro:bit.
//!
//! - `mqtt`: radio transport bridged over an MQTT topic
//! - `shared`: one [`CallPanel`](crate::CallPanel) shared between threads
//!
//! # Shared Panel Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use microbit_cop::services::{MqttRadio, MqttRuntimeConfig, SharedPanel};
//!
//! let (radio, _eventloop) = MqttRadio::connect(MqttRuntimeConfig::default()).await?;
//! let panel = CallPanel::new(radio, ConsoleAudio, ConsoleDisplay::new(), &config)?;
//! let shared = Arc::new(SharedPanel::new(panel));
//! ```

pub mod mqtt;
pub mod shared;

pub use mqtt::*;
pub use shared::*;
