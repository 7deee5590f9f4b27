//! Presentation layer for toolrelay
//!
//! This crate contains the CLI definition, console formatting, the
//! progress reporter and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand, run_turn};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
