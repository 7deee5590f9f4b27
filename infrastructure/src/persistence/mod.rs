//! Session persistence adapters

mod json_store;

pub use json_store::{JsonSessionRepository, SNAPSHOT_VERSION, SessionSnapshot};
