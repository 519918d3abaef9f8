use mongodb::bson::oid::ObjectId;

use crate::models::{MessageRole, MessageContent, TranscriptMessage};
use crate::repositories::MessageRepository;
use crate::error::{Result, StoreError};
use crate::CONTEXT_LOAD_LIMIT;

/// Reconciles the client's locally-held message list with the persisted
/// transcript around a single turn.
///
/// Stateless between invocations: one instance handles exactly one
/// user-turn/assistant-turn cycle. Deduplication on the append path is left
/// to `StoreClient::save_chat`.
#[derive(Clone)]
pub struct TurnReconciler {
    message_repo: MessageRepository,
}

impl TurnReconciler {
    pub fn new(message_repo: MessageRepository) -> Self {
        Self { message_repo }
    }

    /// Produce the full message list to send to the generation call.
    ///
    /// A single-message submission is the common case: the client sends only
    /// its newest message to save bandwidth, and recent history is loaded
    /// here. A longer submission is trusted as-is — the client already holds
    /// full context. An empty submission is a caller error.
    pub async fn expand_for_context(
        &self,
        chat_id: ObjectId,
        submitted: Vec<TranscriptMessage>,
    ) -> Result<Vec<TranscriptMessage>> {
        match plan_context(&submitted) {
            ContextPlan::Reject => Err(StoreError::EmptyTurn),
            ContextPlan::UseSubmitted => Ok(submitted),
            ContextPlan::LoadHistory => {
                let history = self.message_repo
                    .load_recent(chat_id, CONTEXT_LOAD_LIMIT)
                    .await?
                    .into_iter()
                    .map(|record| record.into_transcript())
                    .collect();

                Ok(merge_with_history(history, submitted))
            }
        }
    }
}

/// How a submission gets expanded before the generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPlan {
    /// Empty submission: caller error
    Reject,
    /// Single newest message: stored history is loaded and prepended
    LoadHistory,
    /// Full list from the client: used as-is, history not consulted
    UseSubmitted,
}

pub fn plan_context(submitted: &[TranscriptMessage]) -> ContextPlan {
    match submitted.len() {
        0 => ContextPlan::Reject,
        1 => ContextPlan::LoadHistory,
        _ => ContextPlan::UseSubmitted,
    }
}

/// Append the submitted message(s) to stored history, preserving order.
pub fn merge_with_history(
    mut history: Vec<TranscriptMessage>,
    submitted: Vec<TranscriptMessage>,
) -> Vec<TranscriptMessage> {
    history.extend(submitted);
    history
}

/// Fold the generation output into the full transcript: each generated text
/// becomes an assistant message with a freshly minted stable id, appended in
/// generation order. The result is what gets handed to `save_chat`.
pub fn fold_response(
    mut prior: Vec<TranscriptMessage>,
    generated: Vec<String>,
) -> Vec<TranscriptMessage> {
    for content in generated {
        prior.push(TranscriptMessage::new(
            MessageRole::Assistant,
            MessageContent::Text(content),
        ));
    }
    prior
}
