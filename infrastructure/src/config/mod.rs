//! Configuration file loading for toolrelay
//!
//! Merges configuration from several sources, highest priority first:
//!
//! 1. `TOOLRELAY_*` environment variables
//! 2. `--config <path>`
//! 3. Project root: `./toolrelay.toml` or `./.toolrelay.toml`
//! 4. Global: `<config dir>/toolrelay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_BASE_URL, FileAgentConfig, FileConfig, FileLoggingConfig, FileModelConfig,
    FilePromptsConfig, FileRetryConfig, FileSchemaConfig, FileSessionConfig,
};
pub use loader::{ConfigLoadError, ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILES};
