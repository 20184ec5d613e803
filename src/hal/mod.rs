//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `console`: Log-backed audio/display and channel-fed buttons for running
//!   a panel in a terminal (requires `std` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod console;

pub use mock::*;

#[cfg(feature = "std")]
pub use console::*;
