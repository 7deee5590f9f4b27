//! Dispatch loop domain types.

pub mod state;

pub use state::DispatchState;
