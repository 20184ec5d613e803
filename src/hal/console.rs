//! Terminal-backed hardware for running a panel on a desktop.
//!
//! There is no speaker or LED matrix on a desktop, so audio cues and display
//! updates are written to the log instead. Button presses arrive over a
//! channel, typically fed by a thread reading stdin.
//!
//! # Example
//!
//! ```rust
//! use std::sync::mpsc;
//!
//! use microbit_cop::hal::ChannelButtons;
//! use microbit_cop::traits::{Button, ButtonInput};
//!
//! let (tx, rx) = mpsc::channel();
//! let mut buttons = ChannelButtons::new(rx);
//!
//! tx.send(Button::B).unwrap();
//! assert_eq!(buttons.poll_press(), Some(Button::B));
//! assert_eq!(buttons.poll_press(), None);
//! ```

use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{info, warn};

use crate::indicator::LedPosition;
use crate::traits::{AudioCue, AudioOutput, Button, ButtonInput, IndicatorDisplay};

use super::mock::MATRIX_SIZE;

/// Button presses delivered over an `mpsc` channel.
#[derive(Debug)]
pub struct ChannelButtons {
    rx: Receiver<Button>,
    disconnected: bool,
}

impl ChannelButtons {
    /// Wraps the receiving end of a press channel.
    pub fn new(rx: Receiver<Button>) -> Self {
        Self {
            rx,
            disconnected: false,
        }
    }

    /// True once every sender has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl ButtonInput for ChannelButtons {
    fn poll_press(&mut self) -> Option<Button> {
        match self.rx.try_recv() {
            Ok(button) => Some(button),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.disconnected {
                    warn!("button input closed");
                    self.disconnected = true;
                }
                None
            }
        }
    }
}

/// Audio output that logs each cue.
#[derive(Debug, Default)]
pub struct ConsoleAudio;

impl AudioOutput for ConsoleAudio {
    type Error = core::convert::Infallible;

    fn play(&mut self, cue: AudioCue) -> Result<(), Self::Error> {
        info!(cue = cue.name(), hz = cue.tone_hz(), "audio");
        Ok(())
    }
}

/// LED matrix that logs a picture of itself after each change.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    leds: [[bool; MATRIX_SIZE]; MATRIX_SIZE],
}

impl ConsoleDisplay {
    /// Creates a blank display.
    pub fn new() -> Self {
        Self::default()
    }

    /// The matrix as five rows of `#` (lit) and `.` (unlit).
    pub fn picture(&self) -> String {
        self.leds
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&lit| if lit { '#' } else { '.' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn set(&mut self, at: LedPosition, lit: bool) {
        match self
            .leds
            .get_mut(at.y as usize)
            .and_then(|row| row.get_mut(at.x as usize))
        {
            Some(led) => *led = lit,
            None => warn!(x = at.x, y = at.y, "position outside the matrix"),
        }
    }
}

impl IndicatorDisplay for ConsoleDisplay {
    type Error = core::convert::Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.leds = Default::default();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.leds = Default::default();
        info!("display cleared");
        Ok(())
    }

    fn plot(&mut self, at: LedPosition) -> Result<(), Self::Error> {
        self.set(at, true);
        info!(x = at.x, y = at.y, "display\n{}", self.picture());
        Ok(())
    }

    fn unplot(&mut self, at: LedPosition) -> Result<(), Self::Error> {
        self.set(at, false);
        info!(x = at.x, y = at.y, "display\n{}", self.picture());
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<(), Self::Error> {
        info!(text, "display message");
        Ok(())
    }
}
