//! Use cases (application services)
//!
//! - [`dispatch_loop`] - one user turn: reasoning, completions, tool dispatch
//! - [`completion`] - request assembly through the retry controller
//! - [`retry`] - transient error backoff
//! - [`tool_invocation`] - parse, validate, coerce and invoke one tool call
//! - [`manage_session`] - reset, save, load, list

pub mod completion;
pub mod dispatch_loop;
pub mod manage_session;
pub mod retry;
pub(crate) mod shared;
pub mod tool_invocation;
