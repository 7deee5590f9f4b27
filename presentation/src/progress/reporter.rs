//! Progress reporting for dispatch turns

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use relay_application::ports::dispatch_progress::DispatchProgressNotifier;
use relay_domain::core::string::preview;
use relay_domain::{DispatchState, ToolCallOutcome, ToolCallRequest};
use std::sync::Mutex;
use std::time::Duration;

const ARGUMENT_PREVIEW: usize = 80;
const RESULT_PREVIEW: usize = 100;

/// Spinner while waiting on the model, one line per tool call.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    show_plan: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            show_plan: false,
        }
    }

    /// Print the reasoning plan as soon as it is available.
    pub fn with_plan(mut self, show: bool) -> Self {
        self.show_plan = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, message: &'static str) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        match slot.as_ref() {
            Some(pb) => pb.set_message(message),
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::spinner_style());
                pb.set_message(message);
                pb.enable_steady_tick(Duration::from_millis(100));
                *slot = Some(pb);
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Print above the spinner, if any.
    fn println(&self, line: String) {
        match self.spinner.lock().ok().as_deref().and_then(Option::as_ref) {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchProgressNotifier for ProgressReporter {
    fn on_state_change(&self, _from: DispatchState, to: DispatchState) {
        match to {
            DispatchState::Reasoning => self.start_spinner("Planning..."),
            DispatchState::AwaitingCompletion => self.start_spinner("Thinking..."),
            DispatchState::Dispatching | DispatchState::Terminal | DispatchState::Failed => {
                self.stop_spinner()
            }
            DispatchState::Executing => {}
        }
    }

    fn on_reasoning(&self, plan: &str) {
        if self.show_plan {
            self.println(format!("{}", "Plan:".cyan().bold()));
            for line in plan.lines() {
                self.println(format!("  {}", line.dimmed()));
            }
        }
    }

    fn on_tool_call_started(&self, call: &ToolCallRequest) {
        self.println(format!("  {} {}", "->".cyan(), call_summary(call)));
    }

    fn on_tool_call_finished(&self, outcome: &ToolCallOutcome) {
        let mark = if outcome.success {
            "ok".green()
        } else {
            "failed".red()
        };
        self.println(format!("  {} {}", mark, outcome_summary(outcome).dimmed()));
    }

    fn on_retry(&self, attempt: u32, delay: Duration, error: &str) {
        self.println(format!(
            "  {} attempt {} failed ({}), retrying in {:.1}s",
            "retry".yellow(),
            attempt,
            preview(error, RESULT_PREVIEW),
            delay.as_secs_f64()
        ));
    }

    fn on_final_message(&self, _content: &str) {
        self.stop_spinner();
    }
}

/// `name(args)` with arguments collapsed to one line.
pub fn call_summary(call: &ToolCallRequest) -> String {
    format!(
        "{}({})",
        call.function_name,
        preview(&call.raw_arguments, ARGUMENT_PREVIEW)
    )
}

/// `name [12ms]: content`
pub fn outcome_summary(outcome: &ToolCallOutcome) -> String {
    format!(
        "{} [{}ms]: {}",
        outcome.tool_name,
        outcome.duration_ms,
        preview(&outcome.content, RESULT_PREVIEW)
    )
}
