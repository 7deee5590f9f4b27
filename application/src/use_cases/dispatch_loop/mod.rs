//! Tool dispatch loop use case
//!
//! Runs one user turn against a [`ConversationSession`]:
//!
//! ```text
//! Reasoning ──▶ Executing ──▶ AwaitingCompletion ──▶ Terminal
//!  (optional)                   ▲          │
//!                               │          ▼
//!                               └──── Dispatching
//! ```
//!
//! Every assistant message carrying tool calls is followed by exactly one
//! tool message per call before the next completion is requested. After
//! `max_rounds` dispatched batches one more completion is issued without
//! tools and its answer ends the turn.
//!
//! Fatal errors append an apology as an assistant message so the session
//! stays usable, then surface as [`DispatchError`].

mod types;


pub use types::{DispatchError, TurnOutput};

use crate::config::{AgentConfig, DispatchParams};
use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::dispatch_progress::{DispatchProgressNotifier, NoDispatchProgress};
use crate::ports::prompt_context::{PromptContextProvider, StaticPromptContext};
use crate::ports::tool_registry::ToolRegistryPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::completion::CompletionClient;
use crate::use_cases::shared::check_cancelled;
use crate::use_cases::tool_invocation::ToolInvoker;
use futures::future::join_all;
use relay_domain::{
    CompletionResponse, ConversationSession, DispatchState, Message, PromptContext,
    PromptTemplates, ToolCallOutcome, ToolCallRequest,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case driving completions and tool dispatch for one session.
#[derive(Clone)]
pub struct DispatchLoopUseCase {
    client: CompletionClient,
    invoker: ToolInvoker,
    schema: Arc<dyn ToolSchemaPort>,
    prompts: PromptTemplates,
    assistant_name: String,
    params: DispatchParams,
    prompt_context: Arc<dyn PromptContextProvider>,
    progress: Arc<dyn DispatchProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl DispatchLoopUseCase {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        registry: Arc<dyn ToolRegistryPort>,
        schema: Arc<dyn ToolSchemaPort>,
        config: &AgentConfig,
    ) -> Self {
        let client = CompletionClient::new(gateway, &config.model)
            .with_sampling(config.sampling.clone())
            .with_retry(config.retry.clone());

        Self {
            client,
            invoker: ToolInvoker::new(registry),
            schema,
            prompts: config.prompts.clone(),
            assistant_name: config.assistant_name.clone(),
            params: config.dispatch.clone(),
            prompt_context: Arc::new(StaticPromptContext::default()),
            progress: Arc::new(NoDispatchProgress),
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DispatchProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_prompt_context(mut self, provider: Arc<dyn PromptContextProvider>) -> Self {
        self.prompt_context = provider;
        self
    }

    /// Set a cancellation token checked before every completion
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DispatchParams {
        &mut self.params
    }

    /// Start a session seeded with the rendered system template.
    pub fn new_session(&self) -> ConversationSession {
        let system = self.prompts.system_prompt(&self.context());
        ConversationSession::new(Some(system))
    }

    /// Run one user turn.
    pub async fn execute(
        &self,
        session: &mut ConversationSession,
        message: &str,
    ) -> Result<TurnOutput, DispatchError> {
        if message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }

        let mut state = if self.params.reasoning {
            DispatchState::Reasoning
        } else {
            DispatchState::Executing
        };

        let result = self.run_turn(session, message, &mut state).await;

        if let Err(e) = &result {
            self.transition(&mut state, DispatchState::Failed);
            if e.is_cancelled() {
                info!("Turn cancelled");
            } else {
                warn!(error = %e, "Turn failed");
                self.logger.log(ConversationEvent::new(
                    "error",
                    json!({ "error": e.to_string() }),
                ));
                session.push(Message::assistant(PromptTemplates::apology(&e.to_string())));
            }
        }

        result
    }

    async fn run_turn(
        &self,
        session: &mut ConversationSession,
        message: &str,
        state: &mut DispatchState,
    ) -> Result<TurnOutput, DispatchError> {
        check_cancelled(&self.cancellation_token)?;
        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({ "content": message }),
        ));

        let ctx = self.context();

        let plan = if *state == DispatchState::Reasoning {
            let plan = self.reason(session, message, &ctx).await?;
            session.set_reasoning_plan(Some(plan.clone()));
            self.transition(state, DispatchState::Executing);
            Some(plan)
        } else {
            None
        };

        session.push(Message::user(message));

        let system = self.system_instruction(
            session,
            self.prompts.execution_prompt(&ctx, plan.as_deref()),
        );
        let catalog = self.schema.catalog_schema(&self.invoker.registry().descriptors());

        let mut rounds = 0;
        let mut outcomes = Vec::new();

        loop {
            check_cancelled(&self.cancellation_token)?;
            self.transition(state, DispatchState::AwaitingCompletion);

            let forced = rounds >= self.params.max_rounds;
            let response = if forced {
                info!(rounds, "Tool round limit reached, forcing final answer");
                let system = format!(
                    "{}\n\n{}",
                    system,
                    PromptTemplates::final_synthesis_notice(self.params.max_rounds)
                );
                self.complete(with_system(system, session), None).await?
            } else {
                self.complete(with_system(system.clone(), session), Some(catalog.clone()))
                    .await?
            };

            if forced || !response.has_tool_calls() {
                let final_message = if response.has_tool_calls() {
                    warn!("Ignoring tool calls requested after the round limit");
                    Message::assistant(response.text())
                } else {
                    response.into_message()
                };
                session.push(final_message.clone());
                self.transition(state, DispatchState::Terminal);

                self.logger.log(ConversationEvent::new(
                    "assistant_message",
                    json!({ "content": final_message.text(), "rounds": rounds }),
                ));
                self.progress.on_final_message(final_message.text());

                return Ok(TurnOutput {
                    message: final_message,
                    reasoning_plan: plan,
                    rounds,
                    tool_calls: outcomes,
                    hit_round_limit: forced,
                });
            }

            self.transition(state, DispatchState::Dispatching);
            rounds += 1;

            let assistant = response.into_message();
            let calls = assistant.tool_calls.clone();
            debug!(round = rounds, calls = calls.len(), "Dispatching tool calls");
            session.push(assistant);

            for (message, outcome) in self.dispatch_batch(&calls).await {
                session.push(message);
                outcomes.push(outcome);
            }
        }
    }

    /// Planning-only completion. The plan is not added to the transcript.
    async fn reason(
        &self,
        session: &ConversationSession,
        message: &str,
        ctx: &PromptContext,
    ) -> Result<String, DispatchError> {
        let mut messages = vec![Message::system(self.prompts.reasoning_prompt(ctx))];
        messages.extend(session.recent_history(self.params.reasoning_history_window));
        messages.push(Message::user(PromptTemplates::reasoning_task(message)));

        let response = self.complete(messages, None).await?;
        let plan = response.text().trim().to_string();
        if plan.is_empty() {
            return Err(DispatchError::EmptyReasoning);
        }

        debug!(len = plan.len(), "Reasoning plan recorded");
        self.logger.log(ConversationEvent::new(
            "reasoning",
            json!({ "plan": plan }),
        ));
        self.progress.on_reasoning(&plan);
        Ok(plan)
    }

    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<Value>>,
    ) -> Result<CompletionResponse, GatewayError> {
        self.client
            .complete(messages, tools, |attempt, delay: Duration, e: &GatewayError| {
                self.logger.log(ConversationEvent::new(
                    "retry",
                    json!({
                        "attempt": attempt,
                        "delay_ms": delay.as_millis() as u64,
                        "error": e.to_string(),
                    }),
                ));
                self.progress.on_retry(attempt, delay, &e.to_string());
            })
            .await
    }

    /// Run a batch and return its tool messages in request order.
    async fn dispatch_batch(&self, calls: &[ToolCallRequest]) -> Vec<(Message, ToolCallOutcome)> {
        if !self.params.parallel_tool_calls || calls.len() < 2 {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(self.dispatch_one(call).await);
            }
            return results;
        }

        let mut slots: Vec<Option<(Message, ToolCallOutcome)>> = vec![None; calls.len()];
        for wave in self.plan_waves(calls) {
            let finished = join_all(wave.iter().map(|&i| self.dispatch_one(&calls[i]))).await;
            for (i, result) in wave.into_iter().zip(finished) {
                slots[i] = Some(result);
            }
        }
        slots.into_iter().flatten().collect()
    }

    /// Group call indices into waves that may run concurrently.
    ///
    /// A tool that is not side-effect free appears at most once per wave,
    /// so repeated calls to it keep their request order.
    fn plan_waves(&self, calls: &[ToolCallRequest]) -> Vec<Vec<usize>> {
        let mut waves: Vec<Vec<usize>> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (i, call) in calls.iter().enumerate() {
            let serialized = self
                .invoker
                .registry()
                .lookup(&call.function_name)
                .is_some_and(|h| !h.descriptor().capabilities.side_effect_free);

            let wave = if serialized {
                let count = seen.entry(call.function_name.as_str()).or_insert(0);
                *count += 1;
                *count - 1
            } else {
                0
            };

            if waves.len() <= wave {
                waves.resize_with(wave + 1, Vec::new);
            }
            waves[wave].push(i);
        }

        waves
    }

    async fn dispatch_one(&self, call: &ToolCallRequest) -> (Message, ToolCallOutcome) {
        self.progress.on_tool_call_started(call);
        self.logger.log(ConversationEvent::new(
            "tool_call",
            json!({
                "id": call.id,
                "name": call.function_name,
                "arguments": call.raw_arguments,
            }),
        ));

        let (message, outcome) = self.invoker.invoke(call).await;

        self.logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "id": outcome.tool_call_id,
                "name": outcome.tool_name,
                "success": outcome.success,
                "content": outcome.content,
                "duration_ms": outcome.duration_ms,
            }),
        ));
        self.progress.on_tool_call_finished(&outcome);
        (message, outcome)
    }

    fn transition(&self, state: &mut DispatchState, next: DispatchState) {
        if !state.can_transition_to(next) {
            warn!(from = %state, to = %next, "Unexpected dispatch state transition");
        }
        self.progress.on_state_change(*state, next);
        *state = next;
    }

    fn context(&self) -> PromptContext {
        self.prompt_context.prompt_context(&self.assistant_name)
    }

    /// Session system message (if any) followed by the phase instruction.
    fn system_instruction(&self, session: &ConversationSession, phase: String) -> String {
        match session.system_message().map(Message::text) {
            Some(base) if !base.is_empty() => format!("{}\n\n{}", base, phase),
            _ => phase,
        }
    }
}

/// Request messages: one system instruction, then the non-system history.
fn with_system(system: String, session: &ConversationSession) -> Vec<Message> {
    std::iter::once(Message::system(system))
        .chain(session.history().cloned())
        .collect()
}
