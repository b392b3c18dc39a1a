//! Connection Lifecycle Module
//!
//! Lock-free state holder shared by the store and cache connectors.

use std::sync::atomic::{AtomicU8, Ordering};

// == State Cell ==
/// Forward-only state holder.
///
/// States are encoded as ordered `u8` values. `advance` only ever moves the
/// stored value forward, so a connector that reached a later state can never
/// be moved back to an earlier one.
#[derive(Debug, Default)]
pub struct StateCell(AtomicU8);

impl StateCell {
    /// Creates a cell holding `initial`.
    pub const fn new(initial: u8) -> Self {
        Self(AtomicU8::new(initial))
    }

    /// Returns the current raw state.
    pub fn load(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }

    // == Advance ==
    /// Moves the cell to `next` if it is later than the current state.
    ///
    /// Returns `true` if the transition happened.
    pub fn advance(&self, next: u8) -> bool {
        self.0.fetch_max(next, Ordering::AcqRel) < next
    }
}
