//! Conversation orchestration: send, wait, resume, cancel.
//!
//! A turn's state is derived entirely from history-entry type tags — the
//! server is the sole source of truth, so the only thing a caller must
//! hold on to across restarts is the history id returned by `send` or
//! `resume`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bon::Builder;
use serde::Deserialize;
use serde_json::json;

use crate::client::Client;
use crate::error::{ColloquyError, Result};
use crate::gate::ReadinessGate;
use crate::poll::{await_ready, PollConfig};
use crate::types::{ChatState, EntryType, HistoryEntry, OutputFormat};

/// Per-message options for `send` and `resume`.
#[derive(Debug, Clone, Default, Builder)]
pub struct SendOptions {
    pub output_format: Option<OutputFormat>,
    #[builder(into)]
    pub output_format_options: Option<String>,
    #[builder(default)]
    pub return_trace: bool,
    /// Push-notification destination for progress callbacks. Polling
    /// remains the correctness path regardless.
    #[builder(into)]
    pub destination: Option<String>,
}

/// Which party an interrupted turn is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptionKind {
    /// A human must answer (`questionForUser`).
    User,
    /// An external asynchronous tool must call back (`questionForTool`).
    Tool,
}

/// A turn stopped before producing a final answer. `history_id` is what a
/// later [`ChatHandle::resume`] must reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingInterruption {
    pub history_id: String,
    pub question: String,
    pub kind: InterruptionKind,
}

/// Terminal result of waiting on a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The agent produced a final answer.
    Answered(HistoryEntry),
    /// The turn is suspended pending a continuation.
    Interrupted(PendingInterruption),
}

impl TurnOutcome {
    /// The answer content, if this turn completed with one.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Answered(entry) => Some(&entry.content),
            Self::Interrupted(_) => None,
        }
    }

    /// Unwrap the answer content, mapping an interruption onto
    /// [`ColloquyError::Interrupted`].
    pub fn into_answer(self) -> Result<String> {
        match self {
            Self::Answered(entry) => Ok(entry.content),
            Self::Interrupted(pending) => Err(ColloquyError::Interrupted {
                history_id: pending.history_id,
                question: pending.question,
            }),
        }
    }
}

#[derive(Deserialize)]
struct TurnReceipt {
    #[serde(rename = "historyId")]
    history_id: String,
}

// Observation of one polling probe: either the newest reply entry, or no
// reply yet plus the chat's own state.
enum TurnProbe {
    Reply(HistoryEntry),
    NoReply(Option<ChatState>),
}

/// Drives the conversation in one chat. At most one turn may be
/// outstanding per chat at a time; the server enforces this and the
/// handle never issues overlapping turn operations itself.
#[derive(Debug, Clone)]
pub struct ChatHandle {
    client: Client,
    agent_id: String,
    chat_id: String,
    poll: PollConfig,
    gate_enabled: bool,
    gate_passed: Arc<AtomicBool>,
}

impl ChatHandle {
    pub(crate) fn new(client: Client, agent_id: &str, chat_id: &str) -> Self {
        Self {
            client,
            agent_id: agent_id.to_string(),
            chat_id: chat_id.to_string(),
            poll: PollConfig::default(),
            gate_enabled: true,
            gate_passed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the default polling parameters used by `wait`.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Disable (or re-enable) the tool/resource readiness gate that runs
    /// before the first send.
    pub fn with_gate(mut self, enabled: bool) -> Self {
        self.gate_enabled = enabled;
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Submit a new turn. Returns the turn's history id; poll with
    /// [`wait`](Self::wait).
    pub async fn send(&self, message: impl Into<String>) -> Result<String> {
        self.send_with(message, &SendOptions::default()).await
    }

    pub async fn send_with(
        &self,
        message: impl Into<String>,
        options: &SendOptions,
    ) -> Result<String> {
        self.ensure_gate().await?;

        let message = message.into();
        let mut body = json!({
            "msg": message,
            "outputFormat": options.output_format.unwrap_or_default(),
            "async": true,
            "returnTrace": options.return_trace,
        });
        apply_common_options(&mut body, options);

        tracing::info!(agent_id = %self.agent_id, chat_id = %self.chat_id, "sending message");
        let payload = self
            .client
            .post_message(&self.agent_id, &self.chat_id, "sendMessage", body)
            .await?;
        let receipt: TurnReceipt = serde_json::from_value(payload)?;
        tracing::debug!(history_id = %receipt.history_id, "turn submitted");
        Ok(receipt.history_id)
    }

    /// Wait for the turn identified by `history_id` to reach a terminal
    /// entry, using this handle's default polling parameters.
    pub async fn wait(&self, history_id: &str) -> Result<TurnOutcome> {
        self.wait_with(history_id, self.poll).await
    }

    pub async fn wait_with(&self, history_id: &str, poll: PollConfig) -> Result<TurnOutcome> {
        let probe = await_ready(
            poll,
            || self.probe_turn(history_id),
            |probe: &TurnProbe| {
                matches!(probe, TurnProbe::Reply(entry)
                    if entry.entry_type.is_some_and(|t| t.ends_turn() && !is_failure(t)))
            },
            |probe| match probe {
                TurnProbe::NoReply(Some(ChatState::Failed)) => {
                    Some("chat entered failed state".to_string())
                }
                TurnProbe::Reply(entry)
                    if entry.entry_type.is_some_and(is_failure) =>
                {
                    Some(if entry.content.is_empty() {
                        format!(
                            "turn ended with {}",
                            entry.entry_type.unwrap_or(EntryType::Error)
                        )
                    } else {
                        entry.content.clone()
                    })
                }
                _ => None,
            },
        )
        .await?;

        match probe {
            TurnProbe::Reply(entry) => outcome_from(entry),
            // Unreachable by construction: is_ready only accepts replies.
            TurnProbe::NoReply(_) => Err(ColloquyError::not_ready(
                "poll ended without a reply entry".to_string(),
            )),
        }
    }

    /// Send and wait, returning the full outcome.
    pub async fn send_and_wait(
        &self,
        message: impl Into<String>,
        options: &SendOptions,
    ) -> Result<TurnOutcome> {
        let history_id = self.send_with(message, options).await?;
        self.wait(&history_id).await
    }

    /// Synchronous convenience: send, wait with the default polling
    /// parameters, and return the answer content. An interruption surfaces
    /// as [`ColloquyError::Interrupted`] so the caller can still `resume`.
    pub async fn converse(&self, message: impl Into<String>) -> Result<String> {
        self.send_and_wait(message, &SendOptions::default())
            .await?
            .into_answer()
    }

    /// Resume an interrupted turn by submitting the observation the agent
    /// asked for. Only valid against an unanswered `questionForUser` /
    /// `questionForTool` entry; anything else is rejected by the server as
    /// a caller error.
    pub async fn resume(
        &self,
        history_id: &str,
        observation: impl Into<String>,
    ) -> Result<String> {
        self.resume_with(history_id, observation, &SendOptions::default())
            .await
    }

    pub async fn resume_with(
        &self,
        history_id: &str,
        observation: impl Into<String>,
        options: &SendOptions,
    ) -> Result<String> {
        let mut body = json!({
            "observation": observation.into(),
            "historyId": history_id,
            "async": true,
            "returnTrace": options.return_trace,
        });
        apply_common_options(&mut body, options);

        tracing::info!(
            agent_id = %self.agent_id,
            chat_id = %self.chat_id,
            history_id,
            "continuing interrupted turn"
        );
        let payload = self
            .client
            .post_message(&self.agent_id, &self.chat_id, "continueMessage", body)
            .await?;
        let receipt: TurnReceipt = serde_json::from_value(payload)?;
        Ok(receipt.history_id)
    }

    /// Resume and wait for the next terminal entry.
    pub async fn resume_and_wait(
        &self,
        history_id: &str,
        observation: impl Into<String>,
    ) -> Result<TurnOutcome> {
        let next = self.resume(history_id, observation).await?;
        self.wait(&next).await
    }

    /// Cancel the active turn. Idempotent: canceling a chat with no active
    /// turn is a no-op on the server.
    pub async fn cancel(&self) -> Result<()> {
        tracing::info!(agent_id = %self.agent_id, chat_id = %self.chat_id, "canceling turn");
        self.client.cancel_chat(&self.agent_id, &self.chat_id).await
    }

    async fn ensure_gate(&self) -> Result<()> {
        if !self.gate_enabled || self.gate_passed.load(Ordering::Acquire) {
            return Ok(());
        }
        ReadinessGate::default()
            .ensure_agent_ready(&self.client, &self.agent_id)
            .await?;
        self.gate_passed.store(true, Ordering::Release);
        Ok(())
    }

    // One probe: newest reply entry if any, otherwise the chat state (only
    // fetched while there is no reply, mirroring the single-flight cost of
    // the polling loop).
    async fn probe_turn(&self, history_id: &str) -> Result<TurnProbe> {
        let replies = self
            .client
            .replies_to(&self.agent_id, &self.chat_id, history_id)
            .await?;
        if let Some(entry) = replies.into_iter().max_by(|a, b| a.created_at.cmp(&b.created_at)) {
            return Ok(TurnProbe::Reply(entry));
        }
        let chat = self.client.get_chat(&self.agent_id, &self.chat_id).await?;
        Ok(TurnProbe::NoReply(chat.state))
    }
}

fn apply_common_options(body: &mut serde_json::Value, options: &SendOptions) {
    if let Some(format_options) = &options.output_format_options {
        body["outputFormatOptions"] = json!(format_options);
    }
    if let Some(destination) = &options.destination {
        body["destination"] = json!(destination);
    }
}

fn is_failure(entry_type: EntryType) -> bool {
    matches!(entry_type, EntryType::Error | EntryType::Abort)
}

fn outcome_from(entry: HistoryEntry) -> Result<TurnOutcome> {
    match entry.entry_type {
        Some(EntryType::AnswerForUser) => Ok(TurnOutcome::Answered(entry)),
        Some(EntryType::QuestionForUser) => Ok(TurnOutcome::Interrupted(PendingInterruption {
            history_id: entry.id,
            question: entry.content,
            kind: InterruptionKind::User,
        })),
        Some(EntryType::QuestionForTool) => Ok(TurnOutcome::Interrupted(PendingInterruption {
            history_id: entry.id,
            question: entry.content,
            kind: InterruptionKind::Tool,
        })),
        other => Err(ColloquyError::not_ready(format!(
            "unexpected terminal entry type {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn entry(entry_type: EntryType, content: &str) -> HistoryEntry {
        HistoryEntry {
            id: "h2".to_string(),
            role: Role::Assistant,
            content: content.to_string(),
            entry_type: Some(entry_type),
            previous_id: Some("h1".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn answer_entry_becomes_answered_outcome() {
        let outcome = outcome_from(entry(EntryType::AnswerForUser, "4")).unwrap();
        assert_eq!(outcome.answer(), Some("4"));
    }

    #[test]
    fn question_for_user_becomes_pending_interruption() {
        let outcome = outcome_from(entry(EntryType::QuestionForUser, "Which city?")).unwrap();
        match outcome {
            TurnOutcome::Interrupted(pending) => {
                assert_eq!(pending.kind, InterruptionKind::User);
                assert_eq!(pending.history_id, "h2");
                assert_eq!(pending.question, "Which city?");
            }
            other => panic!("expected interruption, got {other:?}"),
        }
    }

    #[test]
    fn into_answer_maps_interruption_to_error() {
        let outcome = outcome_from(entry(EntryType::QuestionForTool, "callback?")).unwrap();
        let err = outcome.into_answer().unwrap_err();
        match err {
            ColloquyError::Interrupted { history_id, .. } => assert_eq!(history_id, "h2"),
            other => panic!("expected Interrupted, got {other:?}"),
        }
    }

    #[test]
    fn send_options_builder_defaults() {
        let options = SendOptions::builder().build();
        assert!(options.output_format.is_none());
        assert!(!options.return_trace);

        let options = SendOptions::builder()
            .output_format(OutputFormat::Json)
            .output_format_options("{\"schema\": {}}")
            .build();
        assert_eq!(options.output_format, Some(OutputFormat::Json));
    }
}
