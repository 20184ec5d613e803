//! Panel configuration for micro:bit and desktop builds.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! The only setting a deployed panel needs is its floor number. Everything
//! else has a default that matches the panels already on the radio channel.
//!
//! # Example
//!
//! ```rust
//! use microbit_cop::config::{BehaviorConfig, Config, PanelConfig};
//! use microbit_cop::indicator::IndicatorLayout;
//!
//! // Floor 1, reference behavior
//! let config = Config::default();
//! assert!(config.validate().is_ok());
//!
//! // Floor 4, with the corrected variants switched on
//! let config = Config::default()
//!     .with_panel(PanelConfig::default().with_floor_number(4))
//!     .with_behavior(
//!         BehaviorConfig::default()
//!             .with_clear_on_ack(true)
//!             .with_render_on_press(true)
//!             .with_layout(IndicatorLayout::split()),
//!     );
//! assert!(config.validate().is_ok());
//! ```

use heapless::String as HString;

use crate::direction::Fallback;
use crate::indicator::IndicatorLayout;
use crate::protocol::MAX_LABEL;
use crate::state::PanelStatus;

/// Maximum length for short config strings (prefixes, hostnames, client IDs)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (topics)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

/// Digits in the widest floor number (`u16::MAX`).
const MAX_FLOOR_DIGITS: usize = 5;

// ============================================================================
// Helpers for creating heapless strings
// ============================================================================

fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    truncated(s)
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    truncated(s)
}

// ============================================================================
// Errors
// ============================================================================

/// Reasons a configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Floor numbers start at 1.
    ZeroFloor,
    /// A protocol string is empty.
    EmptyField(&'static str),
    /// Prefix + widest floor + suffix does not fit in a label.
    LabelTooLong {
        /// Which prefix.
        field: &'static str,
        /// Worst-case label length in bytes.
        len: usize,
    },
    /// The call prefix contains the ack prefix, so a panel's own calls
    /// would be taken for acknowledgments.
    AmbiguousPrefixes,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroFloor => f.write_str("floor number must be at least 1"),
            ConfigError::EmptyField(field) => write!(f, "{field} must not be empty"),
            ConfigError::LabelTooLong { field, len } => write!(
                f,
                "{field} labels can reach {len} bytes, limit is {MAX_LABEL}"
            ),
            ConfigError::AmbiguousPrefixes => {
                f.write_str("call prefix must not contain the ack prefix")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Panel identity and initial status
    pub panel: PanelConfig,
    /// Wire label conventions
    pub protocol: ProtocolConfig,
    /// Reference or corrected state machine behavior
    pub behavior: BehaviorConfig,
    /// Radio-over-MQTT bridge (desktop only)
    pub mqtt: MqttConfig,
}

impl Config {
    /// Set panel configuration
    pub fn with_panel(mut self, panel: PanelConfig) -> Self {
        self.panel = panel;
        self
    }

    /// Set protocol configuration
    pub fn with_protocol(mut self, protocol: ProtocolConfig) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set behavior configuration
    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set MQTT configuration
    pub fn with_mqtt(mut self, mqtt: MqttConfig) -> Self {
        self.mqtt = mqtt;
        self
    }

    /// Checks the settings a panel cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel.floor_number == 0 {
            return Err(ConfigError::ZeroFloor);
        }
        self.protocol.validate()
    }
}

// ============================================================================
// Panel Config
// ============================================================================

/// Panel identity
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelConfig {
    /// Floor this panel sits on (1-based, fixed for the panel's lifetime)
    pub floor_number: u16,
    /// Status at power-on
    pub status: PanelStatus,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            floor_number: 1,
            status: PanelStatus::Normal,
        }
    }
}

impl PanelConfig {
    /// Set the floor number
    pub fn with_floor_number(mut self, floor: u16) -> Self {
        self.floor_number = floor;
        self
    }

    /// Set the power-on status
    pub fn with_status(mut self, status: PanelStatus) -> Self {
        self.status = status;
        self
    }
}

// ============================================================================
// Protocol Config
// ============================================================================

/// Label conventions shared by every node on the channel
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtocolConfig {
    /// Prefix of call-request labels
    pub call_prefix: ShortString,
    /// Prefix of acknowledgment labels
    pub ack_prefix: ShortString,
    /// Suffix of both label kinds
    pub suffix: ShortString,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            call_prefix: short_string("CP"),
            ack_prefix: short_string("ACK"),
            suffix: short_string("call"),
        }
    }
}

impl ProtocolConfig {
    /// Set the call prefix
    pub fn with_call_prefix(mut self, prefix: &str) -> Self {
        self.call_prefix = short_string(prefix);
        self
    }

    /// Set the acknowledgment prefix
    pub fn with_ack_prefix(mut self, prefix: &str) -> Self {
        self.ack_prefix = short_string(prefix);
        self
    }

    /// Set the label suffix
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = short_string(suffix);
        self
    }

    /// Checks that labels are non-empty, fit, and are distinguishable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("call prefix", &self.call_prefix),
            ("ack prefix", &self.ack_prefix),
            ("suffix", &self.suffix),
        ] {
            if value.is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        for (field, prefix) in [
            ("call prefix", &self.call_prefix),
            ("ack prefix", &self.ack_prefix),
        ] {
            let len = prefix.len() + MAX_FLOOR_DIGITS + self.suffix.len();
            if len > MAX_LABEL {
                return Err(ConfigError::LabelTooLong { field, len });
            }
        }

        if self.call_prefix.contains(self.ack_prefix.as_str()) {
            return Err(ConfigError::AmbiguousPrefixes);
        }

        Ok(())
    }
}

// ============================================================================
// Behavior Config
// ============================================================================

/// State machine and rendering behavior.
///
/// The defaults reproduce deployed panels exactly, including their known
/// defects. Each flag switches on one corrected variant.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorConfig {
    /// How the normalizer treats values strictly between -1 and 1
    pub fallback: Fallback,
    /// Acknowledgments clear the pending flag instead of setting it
    pub clear_on_ack: bool,
    /// Re-render indicators after a local press
    pub render_on_press: bool,
    /// LED positions of the indicators
    pub layout: IndicatorLayout,
}

impl BehaviorConfig {
    /// Set the normalizer fallback
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set whether acknowledgments clear pending calls
    pub fn with_clear_on_ack(mut self, clear: bool) -> Self {
        self.clear_on_ack = clear;
        self
    }

    /// Set whether presses re-render indicators
    pub fn with_render_on_press(mut self, render: bool) -> Self {
        self.render_on_press = render;
        self
    }

    /// Set the indicator layout
    pub fn with_layout(mut self, layout: IndicatorLayout) -> Self {
        self.layout = layout;
        self
    }

    /// True if every flag is at its deployed default.
    pub fn is_reference(&self) -> bool {
        self.fallback == Fallback::PassThrough
            && !self.clear_on_ack
            && !self.render_on_press
            && self.layout.is_shared()
    }
}

// ============================================================================
// MQTT Config
// ============================================================================

/// Radio-over-MQTT bridge configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MqttConfig {
    /// Broker hostname or IP
    pub host: ShortString,
    /// Broker port
    pub port: u16,
    /// Client ID (should be unique per panel)
    pub client_id: ShortString,
    /// Topic every node publishes datagrams to and subscribes on
    pub topic: LongString,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
    /// Whether the bridge is enabled
    pub enabled: bool,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: short_string("localhost"),
            port: 1883,
            client_id: short_string("microbit-cop"),
            topic: long_string("microbit/radio"),
            keep_alive_secs: 30,
            enabled: true,
        }
    }
}

impl MqttConfig {
    /// Set the broker host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = short_string(host);
        self
    }

    /// Set the broker port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the client ID
    pub fn with_client_id(mut self, id: &str) -> Self {
        self.client_id = short_string(id);
        self
    }

    /// Set the radio topic
    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = long_string(topic);
        self
    }

    /// Set the keep-alive interval
    pub fn with_keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Enable or disable the bridge
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
