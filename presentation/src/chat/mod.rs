//! Interactive chat module
//!
//! Provides a reedline-based chat interface over the dispatch loop.

mod repl;

pub use repl::{ChatRepl, ReplCommand, run_turn};
