//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use reedline::{
    DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};
use relay_application::{
    DispatchError, DispatchLoopUseCase, ManageSessionUseCase, ToolRegistryPort, TurnOutput,
};
use relay_domain::ConversationSession;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const HISTORY_SIZE: usize = 1000;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Reset,
    Save(String),
    Load(String),
    Sessions,
    Status,
    Plan,
    Exit,
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next();

        let named = |arg: Option<&str>, usage: &str| {
            arg.map(str::to_string)
                .ok_or_else(|| format!("Usage: {}", usage))
        };

        match command {
            "/help" | "/h" | "/?" => Ok(ReplCommand::Help),
            "/reset" | "/clear" => Ok(ReplCommand::Reset),
            "/save" => named(arg, "/save <name>").map(ReplCommand::Save),
            "/load" => named(arg, "/load <name>").map(ReplCommand::Load),
            "/sessions" => Ok(ReplCommand::Sessions),
            "/status" => Ok(ReplCommand::Status),
            "/plan" => Ok(ReplCommand::Plan),
            "/exit" | "/quit" | "/q" => Ok(ReplCommand::Exit),
            other => Err(format!(
                "Unknown command: {}\nType /help for available commands",
                other
            )),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    dispatch: DispatchLoopUseCase,
    sessions: ManageSessionUseCase,
    registry: Arc<dyn ToolRegistryPort>,
    session: ConversationSession,
    show_plan: bool,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(
        dispatch: DispatchLoopUseCase,
        sessions: ManageSessionUseCase,
        registry: Arc<dyn ToolRegistryPort>,
    ) -> Self {
        let session = dispatch.new_session();
        Self {
            dispatch,
            sessions,
            registry,
            session,
            show_plan: false,
            history_file: dirs::data_dir().map(|p| p.join("toolrelay").join("history.txt")),
        }
    }

    /// Print the reasoning plan above each answer
    pub fn with_plan(mut self, show: bool) -> Self {
        self.show_plan = show;
        self
    }

    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_file else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open REPL history");
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("toolrelay".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match ReplCommand::parse(line) {
                            Ok(ReplCommand::Exit) => {
                                println!("Bye!");
                                break;
                            }
                            Ok(command) => self.handle_command(command).await,
                            Err(message) => println!("{}", message),
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│             toolrelay - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Tools: {}",
            self.registry
                .descriptors()
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Type /help for commands, Ctrl-C cancels a running turn.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /reset            - Clear the conversation");
        println!("  /save <name>      - Save the conversation");
        println!("  /load <name>      - Load a saved conversation");
        println!("  /sessions         - List saved conversations");
        println!("  /status           - Show the tool registry report");
        println!("  /plan             - Show the last reasoning plan");
        println!("  /exit, /quit, /q  - Exit chat");
        println!();
    }

    async fn handle_command(&mut self, command: ReplCommand) {
        match command {
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Reset => {
                self.sessions.reset(&mut self.session);
                println!("{}", "Conversation cleared.".dimmed());
            }
            ReplCommand::Save(name) => match self.sessions.save(&name, &self.session).await {
                Ok(()) => println!("Saved session '{}'.", name),
                Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
            },
            ReplCommand::Load(name) => match self.sessions.load(&name).await {
                Ok(session) => {
                    println!("Loaded session '{}' ({} messages).", name, session.len());
                    self.session = session;
                }
                Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
            },
            ReplCommand::Sessions => match self.sessions.list().await {
                Ok(names) => println!("{}", ConsoleFormatter::format_sessions(&names)),
                Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
            },
            ReplCommand::Status => {
                println!("{}", ConsoleFormatter::format_status(&self.registry.status()))
            }
            ReplCommand::Plan => match self.session.last_reasoning_plan() {
                Some(plan) => println!("{}", plan),
                None => println!("{}", "No plan recorded yet.".dimmed()),
            },
            ReplCommand::Exit => {}
        }
    }

    async fn process_message(&mut self, message: &str) {
        println!();
        match run_turn(&self.dispatch, &mut self.session, message).await {
            Ok(output) => println!("{}", ConsoleFormatter::format_turn(&output, self.show_plan)),
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e)),
        }
        println!();
    }
}

/// Run one turn, cancelling it at the next safe point on Ctrl-C.
pub async fn run_turn(
    dispatch: &DispatchLoopUseCase,
    session: &mut ConversationSession,
    message: &str,
) -> Result<TurnOutput, DispatchError> {
    let token = CancellationToken::new();
    let watcher = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });

    let result = dispatch
        .clone()
        .with_cancellation(token)
        .execute(session, message)
        .await;
    watcher.abort();
    result
}
