//! Tool domain module
//!
//! Defines how tools are described to the model and how the arguments a
//! model sends are turned into values a tool can trust.
//!
//! ```text
//! ┌────────────────┐   schema    ┌──────────────┐
//! │ ToolDescriptor │───────────▶│    model     │
//! │  (ParamType    │             └──────┬───────┘
//! │   tree)        │                    │ raw JSON arguments
//! └───────┬────────┘                    ▼
//!         │            ┌─────────────────────────────────┐
//!         └──────────▶│ validate (strict tools) → coerce │
//!                      └────────────────┬────────────────┘
//!                                       ▼
//!                       ToolHandler::invoke(&ExecutionContext)
//!                                       │
//!                                       ▼
//!                           Result<Value, ToolError>
//! ```
//!
//! # Key Types
//!
//! - [`ToolDescriptor`] - name, description, ordered [`ParameterSpec`]s, capabilities
//! - [`ParamType`](types::ParamType) - tagged type tree for a parameter
//! - [`coerce`](coercion::coerce) - best-effort conversion with explicit tolerance
//! - [`validate_arguments`](validation::validate_arguments) - strict checks
//! - [`ToolHandler`] / [`ToolProvider`] - callable tools and discovery units

pub mod coercion;
pub mod entities;
pub mod provider;
pub mod types;
pub mod validation;
pub mod value_objects;

pub use coercion::{CoercionError, CoercionMode, coerce};
pub use entities::{
    DEFAULT_CATEGORY, ExecutionContext, ParameterSpec, ToolCapabilities, ToolDescriptor,
};
pub use provider::{FnTool, ProviderError, ToolHandler, ToolProvider};
pub use types::{FieldSpec, ParamType, PrimitiveType, RecordType};
pub use validation::{ValidationError, Validator, validate_arguments};
pub use value_objects::{ToolCallOutcome, ToolError};
