//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_CONFIG_FILES: [&str; 2] = ["toolrelay.toml", ".toolrelay.toml"];
pub const ENV_PREFIX: &str = "TOOLRELAY_";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TOOLRELAY_<SECTION>__<KEY>` (e.g. `TOOLRELAY_MODEL__NAME`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolrelay.toml` or `./.toolrelay.toml`
    /// 4. Global: `<config dir>/toolrelay/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigLoadError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigLoadError::NotFound(path.to_path_buf()));
        }

        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();
        Self::figment(global.as_deref(), project.as_deref(), config_path)
            .extract()
            .map_err(|e| ConfigLoadError::Invalid(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Merge the given files over the defaults, then the environment.
    pub fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project, explicit].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolrelay").join("config.toml"))
    }

    /// The first project-level config file that exists.
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Human-readable list of the config sources (for `--show-config`).
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = Vec::new();

        if let Some(path) = explicit {
            lines.push(format!("  {} Explicit: {}", mark(path.exists()), path.display()));
        }
        match Self::project_config_path() {
            Some(path) => lines.push(format!("  {} Project: {}", mark(true), path.display())),
            None => lines.push(format!(
                "  {} Project: ./{} or ./{}",
                mark(false),
                PROJECT_CONFIG_FILES[0],
                PROJECT_CONFIG_FILES[1]
            )),
        }
        if let Some(path) = Self::global_config_path() {
            lines.push(format!("  {} Global:  {}", mark(path.exists()), path.display()));
        }
        lines.push(format!("  [     ] Env:     {}<SECTION>__<KEY>", ENV_PREFIX));
        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
