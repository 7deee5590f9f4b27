//! Configuration value objects for the domain layer
//!
//! Configuration problems are reported as a list of [`ConfigIssue`]s so that
//! a bad value degrades to its default with a warning instead of aborting
//! startup.

mod issue;

pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
