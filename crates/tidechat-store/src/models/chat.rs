use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub const DEFAULT_TITLE: &str = "New Chat";

/// One conversation, owned by exactly one user.
///
/// `last_message_at` only moves forward, and only when a message is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub title: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_message_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(user_id: ObjectId, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            user_id,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            created_at: now,
            last_message_at: now,
        }
    }
}
