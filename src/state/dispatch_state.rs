//! Dispatcher lifecycle definitions
//!
//! A dispatcher only ever moves forward: Receiving, then Draining once the
//! input stream closes, then Done once every worker has reported.

use std::fmt;

/// Represents the current phase of a dispatcher's coordination loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    /// Input stream is open; new tasks spawn workers
    Receiving,

    /// Input stream is closed; waiting for outstanding workers
    Draining,

    /// All workers reported and the aggregate was delivered
    Done,
}

impl DispatchState {
    /// Returns true once the aggregate has been finalized
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while new tasks are still accepted
    pub fn accepts_tasks(&self) -> bool {
        matches!(self, Self::Receiving)
    }

    /// Checks whether moving from `self` to `next` is allowed
    ///
    /// Only the two forward edges are valid; staying put or going back is not.
    pub fn can_transition_to(&self, next: DispatchState) -> bool {
        matches!(
            (self, next),
            (Self::Receiving, Self::Draining) | (Self::Draining, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receiving => "receiving",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
