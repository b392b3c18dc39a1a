//! Store Module
//!
//! Readiness reporting for the durable document store.

mod mongo;

pub use mongo::MongoStore;

// == Store State ==
/// Connection state of the document store.
///
/// Variants are ordered; a connector only ever moves forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum StoreState {
    Connecting = 0,
    Connected = 1,
    Disconnected = 2,
}

impl StoreState {
    pub(crate) fn from_raw(raw: u8) -> Self {
        match raw {
            0 => StoreState::Connecting,
            1 => StoreState::Connected,
            _ => StoreState::Disconnected,
        }
    }
}

// == Store Link ==
/// Read-only view of the document store's readiness.
pub trait StoreLink: Send + Sync {
    /// Returns the current connection state.
    fn state(&self) -> StoreState;

    /// Returns true iff the store is connected.
    fn is_connected(&self) -> bool {
        self.state() == StoreState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(StoreState);

    impl StoreLink for Fixed {
        fn state(&self) -> StoreState {
            self.0
        }
    }

    #[test]
    fn test_is_connected_only_when_connected() {
        assert!(Fixed(StoreState::Connected).is_connected());
        assert!(!Fixed(StoreState::Connecting).is_connected());
        assert!(!Fixed(StoreState::Disconnected).is_connected());
    }

    #[test]
    fn test_state_raw_round_trip() {
        for state in [
            StoreState::Connecting,
            StoreState::Connected,
            StoreState::Disconnected,
        ] {
            assert_eq!(StoreState::from_raw(state as u8), state);
        }
    }
}
