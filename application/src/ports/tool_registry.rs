//! Tool registry port.
//!
//! Read-side view of the registered tools. Registration and discovery are
//! adapter concerns; the dispatch loop only needs lookup and the catalog.

use relay_domain::{ToolDescriptor, ToolHandler};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

/// Summary of the registry contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub total_tools: usize,
    pub total_categories: usize,
    pub tools_by_category: BTreeMap<String, usize>,
    /// Rejected registrations by tool name, e.g. duplicates
    pub registration_errors: BTreeMap<String, String>,
    /// Failed discovery units by source
    pub discovery_errors: BTreeMap<String, String>,
}

impl RegistryStatus {
    pub fn has_errors(&self) -> bool {
        !self.registration_errors.is_empty() || !self.discovery_errors.is_empty()
    }
}

pub trait ToolRegistryPort: Send + Sync {
    /// Handler registered under `name`.
    fn lookup(&self, name: &str) -> Option<Arc<dyn ToolHandler>>;

    /// Descriptors of every registered tool, sorted by name.
    fn descriptors(&self) -> Vec<ToolDescriptor>;

    /// Names of tools tagged with `category`.
    fn by_category(&self, category: &str) -> BTreeSet<String>;

    fn status(&self) -> RegistryStatus;

    fn is_empty(&self) -> bool {
        self.descriptors().is_empty()
    }
}

/// Rejected registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool {0} is already registered")]
    Duplicate(String),

    #[error("Invalid tool name: {0:?}")]
    InvalidName(String),
}
