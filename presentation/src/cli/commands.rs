//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for toolrelay
#[derive(Parser, Debug)]
#[command(name = "toolrelay")]
#[command(author, version, about = "Chat with an LLM that can call local tools")]
#[command(long_about = r#"
toolrelay sends your message to a chat-completion model together with a
catalog of tools. When the model asks for tools, they are run locally and
their results are fed back until the model answers.

Each turn may start with a planning step (disable with --no-reasoning).

Configuration files are loaded from (in priority order):
1. TOOLRELAY_<SECTION>__<KEY>              Environment
2. --config <path>                          Explicit config file
3. ./toolrelay.toml or ./.toolrelay.toml    Project-level config
4. ~/.config/toolrelay/config.toml          Global config

Example:
  toolrelay "What time is it?"
  toolrelay --chat --parallel
  toolrelay --status
"#)]
pub struct Cli {
    /// Message to send (starts chat mode when omitted)
    pub message: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Model identifier (overrides [model].name)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Skip the planning step before each turn
    #[arg(long)]
    pub no_reasoning: bool,

    /// Tool rounds per turn before a final answer is forced
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_rounds: Option<u64>,

    /// Run independent tool calls of one response concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the resolved configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Show the tool registration report and exit
    #[arg(long)]
    pub status: bool,
}

impl Cli {
    /// Chat mode is explicit or implied by a missing message.
    pub fn is_chat(&self) -> bool {
        self.chat || self.message.is_none()
    }
}
