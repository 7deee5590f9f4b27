//! CLI entrypoint for toolrelay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use relay_application::{
    AgentConfig, ConversationLogger, DispatchLoopUseCase, DispatchProgressNotifier,
    ManageSessionUseCase, NoDispatchProgress, ToolRegistryPort,
};
use relay_domain::{Severity, ToolProvider};
use relay_infrastructure::{
    BuiltinToolProvider, ConfigLoader, FileConfig, JsonSchemaToolConverter,
    JsonSessionRepository, JsonlConversationLogger, OpenAiCompatGateway, SystemPromptContext,
    ToolRegistry,
};
use relay_presentation::{ChatRepl, Cli, ConsoleFormatter, ProgressReporter, run_turn};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting toolrelay");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    if cli.show_config {
        println!("Configuration sources (in priority order):");
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&file_config)?);
        return Ok(());
    }

    let issues = file_config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config {}", issue),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Configuration has errors, see above");
    }

    let agent_config = apply_cli_overrides(file_config.to_agent_config(), &cli);

    // === Tools ===
    let registry = Arc::new(ToolRegistry::new());
    let providers: Vec<Arc<dyn ToolProvider>> = vec![Arc::new(BuiltinToolProvider::new())];
    registry.discover(&providers).await;

    if cli.status {
        println!("{}", ConsoleFormatter::format_status(&registry.status()));
        return Ok(());
    }

    // === Dependency Injection ===
    let dispatch = build_dispatch(&file_config, &agent_config, registry.clone(), &cli)?;
    let sessions = ManageSessionUseCase::new(Arc::new(JsonSessionRepository::new(
        file_config.session.directory(),
    )));

    if cli.is_chat() {
        let mut repl = ChatRepl::new(dispatch, sessions, registry);
        repl.run().await?;
        return Ok(());
    }

    let Some(message) = cli.message.as_deref() else {
        bail!("A message is required outside chat mode");
    };

    let mut session = dispatch.new_session();
    match run_turn(&dispatch, &mut session, message).await {
        Ok(output) => {
            println!("{}", ConsoleFormatter::format_turn(&output, false));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            drop(log_guard);
            std::process::exit(1);
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn apply_cli_overrides(config: AgentConfig, cli: &Cli) -> AgentConfig {
    let mut config = match &cli.model {
        Some(model) => config.with_model(model.clone()),
        None => config,
    };
    if cli.no_reasoning {
        config.dispatch = config.dispatch.with_reasoning(false);
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.dispatch = config
            .dispatch
            .with_max_rounds(usize::try_from(max_rounds).unwrap_or(usize::MAX));
    }
    if cli.parallel {
        config.dispatch = config.dispatch.with_parallel_tool_calls(true);
    }
    config
}

fn build_dispatch(
    file_config: &FileConfig,
    agent_config: &AgentConfig,
    registry: Arc<ToolRegistry>,
    cli: &Cli,
) -> Result<DispatchLoopUseCase> {
    let gateway_config = file_config.model.gateway_config();
    if gateway_config.api_key.is_none() {
        warn!(
            env = %file_config.model.api_key_env,
            "No API key found, sending requests without authorization"
        );
    }
    let gateway = Arc::new(OpenAiCompatGateway::new(gateway_config)?);

    let (profile, _) = file_config.schema.parse_profile();
    let schema = Arc::new(JsonSchemaToolConverter::new(profile));

    let progress: Arc<dyn DispatchProgressNotifier> = if cli.quiet {
        Arc::new(NoDispatchProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let registry: Arc<dyn ToolRegistryPort> = registry;
    let mut dispatch = DispatchLoopUseCase::new(gateway, registry, schema, agent_config)
        .with_prompt_context(Arc::new(SystemPromptContext::new()))
        .with_progress(progress);

    if let Some(path) = file_config.logging.conversation_log_path()
        && let Some(logger) = JsonlConversationLogger::try_open(&path)
    {
        info!(path = %logger.path().display(), "Writing conversation log");
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        dispatch = dispatch.with_conversation_logger(logger);
    }

    Ok(dispatch)
}
