//! Console progress output for the dispatch loop

pub mod reporter;
