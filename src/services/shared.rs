//! Shared, lock-protected access to one call panel.
//!
//! `SharedPanel` lets the main loop, an input thread and a status task all
//! drive the same [`CallPanel`] without interleaving handlers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use microbit_cop::services::SharedPanel;
//!
//! let shared = Arc::new(SharedPanel::new(panel));
//!
//! // Main loop handles one event per tick
//! shared.with_panel(|panel| panel.poll(&mut buttons));
//!
//! // Any other thread can read a snapshot
//! let snapshot = shared.state();
//! ```

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::traits::{AudioOutput, IndicatorDisplay, RadioTransport};
use crate::{CallPanel, CallPanelState};

/// One call panel behind a mutex.
///
/// Uses `Mutex` rather than `RwLock`: nearly every access handles an event
/// and needs `&mut`.
pub struct SharedPanel<R, A, D>
where
    R: RadioTransport,
    A: AudioOutput,
    D: IndicatorDisplay,
{
    panel: Mutex<CallPanel<R, A, D>>,
    start_time: Instant,
}

impl<R, A, D> SharedPanel<R, A, D>
where
    R: RadioTransport,
    A: AudioOutput,
    D: IndicatorDisplay,
{
    /// Wrap a panel.
    pub fn new(panel: CallPanel<R, A, D>) -> Self {
        Self {
            panel: Mutex::new(panel),
            start_time: Instant::now(),
        }
    }

    /// Milliseconds since the panel was wrapped.
    #[inline]
    pub fn uptime_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Run `f` with exclusive access to the panel.
    ///
    /// The closure form keeps the lock from being held across await points.
    /// A panic in an earlier closure does not lock the panel out: the state
    /// it left behind is still a valid panel state.
    pub fn with_panel<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut CallPanel<R, A, D>) -> T,
    {
        let mut guard = self.panel.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Snapshot of the panel state.
    pub fn state(&self) -> CallPanelState {
        self.with_panel(|panel| panel.state().clone())
    }

    /// Take the panel back out.
    pub fn into_inner(self) -> CallPanel<R, A, D> {
        self.panel.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
