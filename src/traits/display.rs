//! Display abstraction for the panel's LED matrix.
//!
//! This module defines the [`IndicatorDisplay`] trait. The micro:bit has a
//! 5x5 LED matrix; other boards can map positions onto whatever they have.

use crate::indicator::{LedPosition, RenderCommand};

/// Display trait for call indicators and fault text.
///
/// # Example
///
/// ```ignore
/// use microbit_cop::traits::IndicatorDisplay;
/// use microbit_cop::indicator::LedPosition;
///
/// struct MyMatrix { /* ... */ }
///
/// impl IndicatorDisplay for MyMatrix {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn plot(&mut self, at: LedPosition) -> Result<(), ()> { Ok(()) }
///     fn unplot(&mut self, at: LedPosition) -> Result<(), ()> { Ok(()) }
///     fn show_message(&mut self, text: &str) -> Result<(), ()> { Ok(()) }
/// }
/// ```
pub trait IndicatorDisplay {
    /// Error type for display operations.
    type Error;

    /// Initializes the display hardware. Called once at startup.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Turns every LED off.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Lights one LED.
    fn plot(&mut self, at: LedPosition) -> Result<(), Self::Error>;

    /// Turns one LED off.
    fn unplot(&mut self, at: LedPosition) -> Result<(), Self::Error>;

    /// Shows (or scrolls) a text message.
    fn show_message(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Applies a render command, issuing draw calls in order.
    fn apply(&mut self, cmd: &RenderCommand) -> Result<(), Self::Error> {
        match cmd {
            RenderCommand::Fault(text) => self.show_message(text),
            RenderCommand::Indicators(cmds) => {
                for c in cmds {
                    if c.lit {
                        self.plot(c.position)?;
                    } else {
                        self.unplot(c.position)?;
                    }
                }
                Ok(())
            }
        }
    }
}
