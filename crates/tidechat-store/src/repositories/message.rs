use std::collections::HashSet;

use mongodb::{Client, Collection, bson::doc};
use mongodb::bson::oid::ObjectId;
use futures::TryStreamExt;
use serde::Deserialize;

use crate::models::MessageRecord;
use crate::error::Result;

/// Projection used when only message ids are needed for dedup.
#[derive(Debug, Deserialize)]
struct MessageId {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Clone)]
pub struct MessageRepository {
    collection: Collection<MessageRecord>,
}

impl MessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    /// Save multiple messages in batch order. The insert is unordered and
    /// duplicate-key conflicts are treated as success: a racing save that
    /// already persisted some of these ids must not stop the rest of the
    /// batch, and per-id at-most-once is exactly what the dedup wants.
    pub async fn save_messages(&self, messages: Vec<MessageRecord>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }
        match self.collection.insert_many(messages).ordered(false).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key_only(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get up to `limit` most recent messages for a chat, returned in
    /// chronological order
    pub async fn load_recent(&self, chat_id: ObjectId, limit: i64) -> Result<Vec<MessageRecord>> {
        let filter = doc! { "chat_id": chat_id };
        let mut messages: Vec<MessageRecord> = self.collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        messages.reverse(); // Return in chronological order
        Ok(messages)
    }

    /// Ids of all messages already persisted for a chat
    pub async fn existing_ids(&self, chat_id: ObjectId) -> Result<HashSet<String>> {
        let filter = doc! { "chat_id": chat_id };
        let ids: Vec<MessageId> = self.collection
            .clone_with_type::<MessageId>()
            .find(filter)
            .projection(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(ids.into_iter().map(|m| m.id).collect())
    }

    /// Remove all messages belonging to a chat. Returns the number removed.
    pub async fn delete_for_chat(&self, chat_id: ObjectId) -> Result<u64> {
        let filter = doc! { "chat_id": chat_id };
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}

const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when a batch insert failed solely on duplicate `_id`s — another
/// writer got there first, which counts as persisted.
fn is_duplicate_key_only(error: &mongodb::error::Error) -> bool {
    match &*error.kind {
        mongodb::error::ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()
            .map(|errors| {
                !errors.is_empty() && errors.iter().all(|e| e.code == DUPLICATE_KEY_CODE)
            })
            .unwrap_or(false),
        _ => false,
    }
}
