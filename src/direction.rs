//! Call direction and the signal normalizer that guards it.
//!
//! A call signal travels as a plain number. Before it is encoded or acted on,
//! it is clamped to one of the two direction codes:
//!
//! | Input            | Result                          |
//! |------------------|---------------------------------|
//! | `x >= 1`         | `1.0` (up)                      |
//! | `x <= -1`        | `-1.0` (down)                   |
//! | `-1 < x < 1`     | decided by [`Fallback`]         |
//!
//! The band between the two codes is not covered by the clamp. The default
//! [`Fallback::PassThrough`] returns such inputs unchanged, which means
//! `normalize(0.0) == 0.0`. This matches what deployed panels do and is a
//! known fallthrough, not a deliberate policy; [`Fallback::Toward`] picks a
//! direction instead.
//!
//! # Example
//!
//! ```
//! use microbit_cop::direction::{normalize, Direction, Fallback};
//!
//! assert_eq!(normalize(7.0), 1.0);
//! assert_eq!(normalize(-1.0), -1.0);
//! assert_eq!(normalize(0.0), 0.0);
//!
//! let fallback = Fallback::Toward(Direction::Up);
//! assert_eq!(fallback.normalize(0.25), 1.0);
//! ```

/// Direction of a hall call.
///
/// There is no "stopped" value at this layer: every call is either for a
/// car going down or a car going up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Call for a car travelling down (wire value `-1`).
    Down,
    /// Call for a car travelling up (wire value `+1`).
    Up,
}

impl Direction {
    /// Both directions, in render order.
    pub const ALL: [Direction; 2] = [Direction::Down, Direction::Up];

    /// Wire value of this direction.
    ///
    /// ```
    /// use microbit_cop::Direction;
    ///
    /// assert_eq!(Direction::Down.value(), -1);
    /// assert_eq!(Direction::Up.value(), 1);
    /// ```
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            Direction::Down => -1,
            Direction::Up => 1,
        }
    }

    /// Maps an already-normalized value to a direction.
    ///
    /// Only exactly `1.0` and `-1.0` map; anything left in the pass-through
    /// band yields `None`.
    pub fn from_value(value: f64) -> Option<Self> {
        if value == 1.0 {
            Some(Direction::Up)
        } else if value == -1.0 {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Lowercase name, for logs and JSON.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
        }
    }
}

impl From<Direction> for i32 {
    fn from(direction: Direction) -> Self {
        direction.value()
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the normalizer does with inputs strictly between `-1` and `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Fallback {
    /// Return the input unchanged. Deployed panels behave this way.
    #[default]
    PassThrough,
    /// Treat the input as a call in the given direction.
    Toward(Direction),
}

impl Fallback {
    /// Clamps `value` to a direction code, applying this fallback to the
    /// uncovered band.
    ///
    /// Total: never panics and never fails. `NaN` satisfies neither bound
    /// and is handled by the fallback.
    pub fn normalize(self, value: f64) -> f64 {
        if value >= 1.0 {
            1.0
        } else if value <= -1.0 {
            -1.0
        } else {
            match self {
                Fallback::PassThrough => value,
                Fallback::Toward(direction) => direction.value() as f64,
            }
        }
    }

    /// Normalizes and maps to a [`Direction`] in one step.
    pub fn direction(self, value: f64) -> Option<Direction> {
        Direction::from_value(self.normalize(value))
    }
}

/// Clamps `value` with the default [`Fallback::PassThrough`] policy.
#[inline]
pub fn normalize(value: f64) -> f64 {
    Fallback::PassThrough.normalize(value)
}
