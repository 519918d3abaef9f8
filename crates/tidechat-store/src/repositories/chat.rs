use mongodb::{Client, Collection, bson::doc};
use mongodb::bson::oid::ObjectId;
use futures::TryStreamExt;

use crate::models::Chat;
use crate::error::Result;

#[derive(Clone)]
pub struct ChatRepository {
    collection: Collection<Chat>,
}

impl ChatRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chats");
        Self { collection }
    }

    /// Create a new chat owned by `user_id`
    pub async fn create_chat(&self, user_id: ObjectId, title: Option<String>) -> Result<Chat> {
        let chat = Chat::new(user_id, title);
        self.collection.insert_one(&chat).await?;
        Ok(chat)
    }

    /// Get chat by ID if owned by `user_id`
    pub async fn find_owned(&self, chat_id: ObjectId, user_id: ObjectId) -> Result<Option<Chat>> {
        let filter = doc! { "_id": chat_id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// List a user's chats, most recently active first
    pub async fn list_chats(
        &self,
        user_id: ObjectId,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<Chat>> {
        let filter = doc! { "user_id": user_id };
        let chats = self.collection
            .find(filter)
            .sort(doc! { "last_message_at": -1 })
            .skip(offset)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(chats)
    }

    /// Bump last_message_at to now
    pub async fn touch_last_message(&self, chat_id: ObjectId) -> Result<()> {
        let filter = doc! { "_id": chat_id };
        let update = doc! { "$set": { "last_message_at": bson::DateTime::now() } };
        self.collection.update_one(filter, update).await?;
        Ok(())
    }

    /// Delete a chat if owned by `user_id`. Returns whether a chat was removed.
    pub async fn delete_chat(&self, chat_id: ObjectId, user_id: ObjectId) -> Result<bool> {
        let filter = doc! { "_id": chat_id, "user_id": user_id };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count == 1)
    }
}
