//! Hardware abstraction traits for buttons and audio.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`ButtonInput`] | Edge-triggered directional button presses |
//! | [`AudioOutput`] | Audio cue playback |
//!
//! # Example
//!
//! ```rust
//! use microbit_cop::traits::{AudioCue, AudioOutput, Button, ButtonInput};
//! use microbit_cop::hal::{MockAudio, MockButtons};
//!
//! let mut buttons = MockButtons::new();
//! buttons.press(Button::A);
//! assert_eq!(buttons.poll_press(), Some(Button::A));
//!
//! let mut audio = MockAudio::new();
//! audio.play(AudioCue::ButtonClick).unwrap();
//! assert_eq!(audio.played, vec![AudioCue::ButtonClick]);
//! ```

use crate::direction::Direction;

/// A physical button on the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// Left button, wired as the down call.
    A,
    /// Right button, wired as the up call.
    B,
}

impl Button {
    /// The direction this button calls. Fixed wiring, not configurable.
    ///
    /// ```
    /// use microbit_cop::{traits::Button, Direction};
    ///
    /// assert_eq!(Button::A.direction(), Direction::Down);
    /// assert_eq!(Button::B.direction(), Direction::Up);
    /// ```
    #[inline]
    pub const fn direction(self) -> Direction {
        match self {
            Button::A => Direction::Down,
            Button::B => Direction::Up,
        }
    }

    /// Parse a button from text input.
    ///
    /// Accepts the button letter or the direction name, trimmed and
    /// case-insensitive.
    ///
    /// ```
    /// use microbit_cop::traits::Button;
    ///
    /// assert_eq!(Button::from_text("a"), Some(Button::A));
    /// assert_eq!(Button::from_text(" Down "), Some(Button::A));
    /// assert_eq!(Button::from_text("UP"), Some(Button::B));
    /// assert_eq!(Button::from_text("c"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("a") || s.eq_ignore_ascii_case("down") {
            Some(Button::A)
        } else if s.eq_ignore_ascii_case("b") || s.eq_ignore_ascii_case("up") {
            Some(Button::B)
        } else {
            None
        }
    }
}

/// Source of button press events.
///
/// Debouncing and edge detection are the implementor's job: each press is
/// reported exactly once.
pub trait ButtonInput {
    /// Returns the next press since the last call, if any.
    fn poll_press(&mut self) -> Option<Button>;
}

/// A named sound the panel can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioCue {
    /// Short tone confirming a button press.
    ButtonClick,
}

impl AudioCue {
    /// Cue name as used on the wire and in logs.
    pub const fn name(self) -> &'static str {
        match self {
            AudioCue::ButtonClick => "buttonClick",
        }
    }

    /// Tone frequency in hertz (G4 for the click).
    pub const fn tone_hz(self) -> u32 {
        match self {
            AudioCue::ButtonClick => 392,
        }
    }

    /// Looks up a cue by name.
    ///
    /// Matching is by containment, so `"buttonClick-loud"` still resolves to
    /// [`AudioCue::ButtonClick`].
    pub fn from_name(name: &str) -> Option<Self> {
        if name.contains(AudioCue::ButtonClick.name()) {
            Some(AudioCue::ButtonClick)
        } else {
            None
        }
    }
}

/// Audio output trait.
///
/// Implementations ring a tone on a buzzer or speaker. Playback is
/// fire-and-forget; `play` should not block for the tone's duration.
pub trait AudioOutput {
    /// Error type for audio operations.
    type Error;

    /// Plays `cue`.
    fn play(&mut self, cue: AudioCue) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Button Tests
    // =========================================================================

    #[test]
    fn button_wiring() {
        assert_eq!(Button::A.direction(), Direction::Down);
        assert_eq!(Button::B.direction(), Direction::Up);
    }

    #[test]
    fn button_from_text() {
        assert_eq!(Button::from_text("A"), Some(Button::A));
        assert_eq!(Button::from_text("b"), Some(Button::B));
        assert_eq!(Button::from_text("down"), Some(Button::A));
        assert_eq!(Button::from_text("\tup\n"), Some(Button::B));
        assert_eq!(Button::from_text(""), None);
        assert_eq!(Button::from_text("ab"), None);
    }

    // =========================================================================
    // AudioCue Tests
    // =========================================================================

    #[test]
    fn audio_cue_name() {
        assert_eq!(AudioCue::ButtonClick.name(), "buttonClick");
        assert_eq!(AudioCue::ButtonClick.tone_hz(), 392);
    }

    #[test]
    fn audio_cue_from_name_containment() {
        assert_eq!(AudioCue::from_name("buttonClick"), Some(AudioCue::ButtonClick));
        assert_eq!(
            AudioCue::from_name("play_buttonClick_now"),
            Some(AudioCue::ButtonClick)
        );
        assert_eq!(AudioCue::from_name("buttonclick"), None);
        assert_eq!(AudioCue::from_name("chime"), None);
    }

    // =========================================================================
    // ButtonInput Tests
    // =========================================================================

    struct OnePress(Option<Button>);

    impl ButtonInput for OnePress {
        fn poll_press(&mut self) -> Option<Button> {
            self.0.take()
        }
    }

    #[test]
    fn button_input_reports_once() {
        let mut input = OnePress(Some(Button::B));
        assert_eq!(input.poll_press(), Some(Button::B));
        assert_eq!(input.poll_press(), None);
    }
}
