//! Projection of panel state onto the LED matrix.
//!
//! [`render`] is pure: it turns a [`CallPanelState`] into a [`RenderCommand`]
//! that the panel then applies to an
//! [`IndicatorDisplay`](crate::traits::IndicatorDisplay).
//!
//! # Shared indicator position
//!
//! With the default [`IndicatorLayout::shared`] both directions draw to the
//! same LED. Commands are issued down first, then up, so the up flag always
//! decides what is finally visible:
//!
//! ```
//! use microbit_cop::indicator::{render, IndicatorLayout, LedPosition};
//! use microbit_cop::state::CallPanelState;
//!
//! let mut state = CallPanelState::new(1);
//! state.pending.down = true;
//!
//! let cmd = render(&state, &IndicatorLayout::shared());
//! let visible = cmd.final_state();
//! assert_eq!(visible.len(), 1);
//! assert!(!visible[0].lit); // down was lit, then up unlit the same LED
//! ```
//!
//! [`IndicatorLayout::split`] gives each direction its own LED.

use heapless::Vec as HVec;

use crate::direction::Direction;
use crate::state::CallPanelState;

/// Text shown instead of indicators when the panel is out of order.
pub const FAULT_MESSAGE: &str = "OUT OF ORDER";

/// An LED on the 5x5 matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedPosition {
    /// Column, 0-4.
    pub x: u8,
    /// Row, 0-4.
    pub y: u8,
}

impl LedPosition {
    /// Creates a position.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Where each direction's indicator is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorLayout {
    /// Down indicator.
    pub down: LedPosition,
    /// Up indicator.
    pub up: LedPosition,
}

impl IndicatorLayout {
    /// Both indicators on the centre LED, as deployed panels draw them.
    pub const fn shared() -> Self {
        Self {
            down: LedPosition::new(2, 2),
            up: LedPosition::new(2, 2),
        }
    }

    /// Down on the bottom-centre LED, up on the top-centre LED.
    pub const fn split() -> Self {
        Self {
            down: LedPosition::new(2, 4),
            up: LedPosition::new(2, 0),
        }
    }

    /// Position for `direction`.
    pub fn position(&self, direction: Direction) -> LedPosition {
        match direction {
            Direction::Down => self.down,
            Direction::Up => self.up,
        }
    }

    /// True if both directions share an LED.
    pub fn is_shared(&self) -> bool {
        self.down == self.up
    }
}

impl Default for IndicatorLayout {
    fn default() -> Self {
        Self::shared()
    }
}

/// Light or clear one LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorCommand {
    /// Which direction produced the command.
    pub direction: Direction,
    /// Target LED.
    pub position: LedPosition,
    /// `true` to light, `false` to clear.
    pub lit: bool,
}

/// What the display should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderCommand {
    /// Show a fault message and no indicators.
    Fault(&'static str),
    /// Apply indicator commands in order: down, then up.
    Indicators([IndicatorCommand; 2]),
}

impl RenderCommand {
    /// Visible result per LED after applying the commands in order.
    ///
    /// Empty for [`RenderCommand::Fault`].
    pub fn final_state(&self) -> HVec<IndicatorCommand, 2> {
        let mut visible: HVec<IndicatorCommand, 2> = HVec::new();
        if let RenderCommand::Indicators(cmds) = self {
            for cmd in cmds {
                match visible.iter_mut().find(|v| v.position == cmd.position) {
                    Some(existing) => *existing = *cmd,
                    None => {
                        let _ = visible.push(*cmd);
                    }
                }
            }
        }
        visible
    }

    /// Whether the LED at `position` ends up lit.
    pub fn is_lit(&self, position: LedPosition) -> bool {
        self.final_state()
            .iter()
            .any(|cmd| cmd.position == position && cmd.lit)
    }
}

/// Renders `state` with `layout`.
pub fn render(state: &CallPanelState, layout: &IndicatorLayout) -> RenderCommand {
    if state.is_out_of_order() {
        return RenderCommand::Fault(FAULT_MESSAGE);
    }

    RenderCommand::Indicators(Direction::ALL.map(|direction| IndicatorCommand {
        direction,
        position: layout.position(direction),
        lit: state.pending.get(direction),
    }))
}
