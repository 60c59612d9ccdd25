//! Lifecycle state of the dispatcher

mod dispatch_state;

pub use dispatch_state::DispatchState;
