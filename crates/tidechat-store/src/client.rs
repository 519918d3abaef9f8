use std::collections::HashSet;

use mongodb::Client;
use mongodb::bson::oid::ObjectId;

use crate::models::{Chat, MessageRecord, TranscriptMessage};
use crate::repositories::{ChatRepository, MessageRepository, UserRepository};
use crate::reconcile::TurnReconciler;
use crate::builder::StoreClientBuilder;
use crate::error::{Result, StoreError};

/// Facade over the transcript store: chat/message/user repositories plus the
/// transcript-level operations the chat endpoint drives.
pub struct StoreClient {
    chat_repo: ChatRepository,
    message_repo: MessageRepository,
    user_repo: UserRepository,
    reconciler: TurnReconciler,
}

impl StoreClient {
    pub async fn new(mongodb_uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let chat_repo = ChatRepository::new(&client, db_name);
        let message_repo = MessageRepository::new(&client, db_name);
        let user_repo = UserRepository::new(&client, db_name);
        let reconciler = TurnReconciler::new(message_repo.clone());

        Ok(Self {
            chat_repo,
            message_repo,
            user_repo,
            reconciler,
        })
    }

    pub fn builder() -> StoreClientBuilder {
        StoreClientBuilder::new()
    }

    pub fn chats(&self) -> &ChatRepository {
        &self.chat_repo
    }

    pub fn messages(&self) -> &MessageRepository {
        &self.message_repo
    }

    pub fn users(&self) -> &UserRepository {
        &self.user_repo
    }

    pub fn reconciler(&self) -> &TurnReconciler {
        &self.reconciler
    }

    /// Create a new chat owned by `user_id`
    pub async fn create_chat(&self, user_id: ObjectId, title: Option<String>) -> Result<Chat> {
        self.chat_repo.create_chat(user_id, title).await
    }

    /// Load up to `limit` most recent messages, oldest first. An empty chat
    /// yields an empty list, never an error. No ownership check — callers
    /// authorize separately before exposing the content.
    pub async fn load_chat(
        &self,
        chat_id: ObjectId,
        limit: i64,
    ) -> Result<Vec<TranscriptMessage>> {
        let records = self.message_repo.load_recent(chat_id, limit).await?;
        Ok(records.into_iter().map(|r| r.into_transcript()).collect())
    }

    /// Persist the messages in `candidate` that are not already stored for
    /// this chat, preserving their ids and relative order. Bumps the chat's
    /// `last_message_at` only when something was inserted, which makes the
    /// operation idempotent: a repeat call with the same candidate list
    /// inserts nothing and leaves the chat untouched.
    ///
    /// Returns the number of messages inserted.
    pub async fn save_chat(
        &self,
        chat_id: ObjectId,
        candidate: &[TranscriptMessage],
        user_id: ObjectId,
    ) -> Result<usize> {
        let chat = self.chat_repo.find_owned(chat_id, user_id).await?;
        if chat.is_none() {
            return Err(StoreError::AccessDenied(chat_id.to_hex()));
        }

        let existing = self.message_repo.existing_ids(chat_id).await?;
        let new_messages = partition_new(candidate, &existing);

        if new_messages.is_empty() {
            return Ok(0);
        }

        let records: Vec<MessageRecord> = new_messages
            .iter()
            .map(|m| MessageRecord::from_transcript(m, chat_id, user_id))
            .collect();
        let inserted = records.len();

        self.message_repo.save_messages(records).await?;
        self.chat_repo.touch_last_message(chat_id).await?;

        Ok(inserted)
    }

    /// List the owner's chats, most recently active first
    pub async fn list_chats(
        &self,
        user_id: ObjectId,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<Chat>> {
        self.chat_repo.list_chats(user_id, limit, offset).await
    }

    /// Delete a chat the acting user owns. The chat record is removed
    /// synchronously; its messages are cleaned up by a background task whose
    /// failure is logged, not surfaced — the deleted chat is already gone
    /// from listings either way.
    pub async fn delete_chat(&self, chat_id: ObjectId, user_id: ObjectId) -> Result<()> {
        let deleted = self.chat_repo.delete_chat(chat_id, user_id).await?;
        if !deleted {
            return Err(StoreError::AccessDenied(chat_id.to_hex()));
        }

        let message_repo = self.message_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = message_repo.delete_for_chat(chat_id).await {
                tracing::error!("Failed to delete messages for chat {}: {}", chat_id, e);
            }
        });

        Ok(())
    }
}

/// Identity-based set difference: the candidates whose ids are not yet
/// persisted, in candidate order. Dedup is per message id, never content, so
/// repeated saves of the same logical append stay at-most-once.
pub fn partition_new<'a>(
    candidate: &'a [TranscriptMessage],
    existing: &HashSet<String>,
) -> Vec<&'a TranscriptMessage> {
    candidate
        .iter()
        .filter(|m| !existing.contains(&m.id))
        .collect()
}
