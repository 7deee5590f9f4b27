//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DispatchParams`] - loop control (reasoning, rounds, parallel dispatch)
//! - [`RetryPolicy`] - completion retry and backoff
//! - [`SamplingParams`] - decoding parameters
//! - [`AgentConfig`] - container for all of the above plus model and prompts

pub mod agent_config;
pub mod dispatch_params;
pub mod retry_policy;
pub mod sampling;

pub use agent_config::AgentConfig;
pub use dispatch_params::DispatchParams;
pub use retry_policy::RetryPolicy;
pub use sampling::SamplingParams;
