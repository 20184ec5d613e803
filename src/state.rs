//! Panel state: floor identity, pending calls, and status.
//!
//! [`CallPanelState`] is created once at startup and mutated by exactly two
//! events: a local button press and an inbound radio message. It holds no
//! hardware handles; [`CallPanel`](crate::CallPanel) owns it and drives the
//! hardware.

use crate::direction::Direction;
use crate::protocol::CallMessage;

/// Operating status of a panel.
///
/// The wire/status codes are `0` for normal and `-1` for out of order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelStatus {
    /// Accepting calls, indicators rendered.
    #[default]
    Normal,
    /// Indicators replaced by a fault message.
    OutOfOrder,
}

impl PanelStatus {
    /// Numeric status code.
    pub const fn code(self) -> i32 {
        match self {
            PanelStatus::Normal => 0,
            PanelStatus::OutOfOrder => -1,
        }
    }

    /// Parses a numeric status code. Only `0` and `-1` are known.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PanelStatus::Normal),
            -1 => Some(PanelStatus::OutOfOrder),
            _ => None,
        }
    }
}

/// One flag per direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCalls {
    /// A down call is pending.
    pub down: bool,
    /// An up call is pending.
    pub up: bool,
}

impl PendingCalls {
    /// Flag for `direction`.
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Down => self.down,
            Direction::Up => self.up,
        }
    }

    /// Sets the flag for `direction`.
    pub fn set(&mut self, direction: Direction, pending: bool) {
        match direction {
            Direction::Down => self.down = pending,
            Direction::Up => self.up = pending,
        }
    }

    /// True if neither flag is set.
    pub fn is_idle(&self) -> bool {
        !self.down && !self.up
    }
}

/// In-memory state of one call panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallPanelState {
    floor_number: u16,
    /// Pending call flags.
    pub pending: PendingCalls,
    /// Most recent inbound message. Overwritten on every receive.
    pub last_received: Option<CallMessage>,
    /// Operating status.
    pub status: PanelStatus,
    /// Last encoded outbound message.
    pub send_buffer: CallMessage,
}

impl CallPanelState {
    /// Creates state for `floor_number` with no pending calls.
    ///
    /// The floor number is fixed for the lifetime of the state. It is
    /// expected to be positive; [`Config::validate`](crate::Config::validate)
    /// rejects zero before a panel is built.
    pub fn new(floor_number: u16) -> Self {
        Self {
            floor_number,
            pending: PendingCalls::default(),
            last_received: None,
            status: PanelStatus::Normal,
            send_buffer: CallMessage::default(),
        }
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: PanelStatus) -> Self {
        self.status = status;
        self
    }

    /// The panel's floor.
    pub fn floor_number(&self) -> u16 {
        self.floor_number
    }

    /// True when the panel shows the fault message.
    pub fn is_out_of_order(&self) -> bool {
        self.status == PanelStatus::OutOfOrder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle() {
        let state = CallPanelState::new(3);
        assert_eq!(state.floor_number(), 3);
        assert!(state.pending.is_idle());
        assert!(state.last_received.is_none());
        assert_eq!(state.status, PanelStatus::Normal);
        assert_eq!(state.send_buffer, CallMessage::default());
        assert!(!state.is_out_of_order());
    }

    #[test]
    fn with_status() {
        let state = CallPanelState::new(1).with_status(PanelStatus::OutOfOrder);
        assert!(state.is_out_of_order());
    }

    #[test]
    fn pending_get_set() {
        let mut pending = PendingCalls::default();
        pending.set(Direction::Up, true);
        assert!(pending.get(Direction::Up));
        assert!(!pending.get(Direction::Down));
        assert!(!pending.is_idle());

        pending.set(Direction::Down, true);
        pending.set(Direction::Up, false);
        assert!(pending.down);
        assert!(!pending.up);
    }

    #[test]
    fn status_codes() {
        assert_eq!(PanelStatus::Normal.code(), 0);
        assert_eq!(PanelStatus::OutOfOrder.code(), -1);
        assert_eq!(PanelStatus::from_code(0), Some(PanelStatus::Normal));
        assert_eq!(PanelStatus::from_code(-1), Some(PanelStatus::OutOfOrder));
        assert_eq!(PanelStatus::from_code(1), None);
    }
}
