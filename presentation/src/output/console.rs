//! Console output formatter for turns, registry status and sessions

use colored::Colorize;
use relay_application::{DispatchError, RegistryStatus, TurnOutput};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The assistant's answer, optionally preceded by the plan.
    pub fn format_turn(output: &TurnOutput, show_plan: bool) -> String {
        let mut out = String::new();

        if show_plan && let Some(plan) = &output.reasoning_plan {
            out.push_str(&format!("{}\n", "Plan:".cyan().bold()));
            out.push_str(&Self::indent(plan, "  "));
            out.push_str("\n\n");
        }

        out.push_str(output.text());

        if output.hit_round_limit {
            out.push_str(&format!(
                "\n\n{}",
                format!("(stopped after {} tool rounds)", output.rounds).dimmed()
            ));
        }
        out
    }

    pub fn format_error(error: &DispatchError) -> String {
        match error {
            DispatchError::Cancelled => format!("{}", "Cancelled.".yellow()),
            other => format!("{} {}", "Error:".red().bold(), other),
        }
    }

    /// The registration report printed by `--status` and `/status`.
    pub fn format_status(status: &RegistryStatus) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Tool Registry"));
        out.push('\n');
        out.push_str(&format!(
            "{} {}   {} {}\n",
            "Tools:".cyan().bold(),
            status.total_tools,
            "Categories:".cyan().bold(),
            status.total_categories
        ));

        if !status.tools_by_category.is_empty() {
            out.push('\n');
            for (category, count) in &status.tools_by_category {
                out.push_str(&format!("  {:<20} {}\n", category, count));
            }
        }

        for (title, errors) in [
            ("Registration errors:", &status.registration_errors),
            ("Discovery errors:", &status.discovery_errors),
        ] {
            if !errors.is_empty() {
                out.push_str(&format!("\n{}\n", title.yellow().bold()));
                for (key, message) in errors {
                    out.push_str(&format!("  * {}: {}\n", key, message));
                }
            }
        }
        out
    }

    pub fn format_sessions(names: &[String]) -> String {
        if names.is_empty() {
            return format!("{}", "No saved sessions.".dimmed());
        }
        names
            .iter()
            .map(|n| format!("  - {}", n))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(40);
        format!("{}\n{:^40}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
