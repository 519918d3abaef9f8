use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use tidechat_llm::{Content, Message as LLMMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Message content: plain text, or a sequence of typed parts for richer
/// transcripts. Untagged so plain strings round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    Text {
        text: String,
    },

    Image {
        image: String,
    },

    File {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },

    Audio {
        audio: AudioData,
    },

    ToolCall {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: String,
        args: serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
        #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioData {
    pub data: String,
    pub format: String,
}

impl MessageContent {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Flatten to plain text for the generation call. Non-text parts are
    /// skipped; tool calls carry no prompt-visible text.
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    MessagePart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A message as it travels between client, reconciler and generation call.
///
/// The id is stable: assigned once by whichever side first materializes the
/// message, and preserved verbatim when persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: MessageContent,
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TranscriptMessage {
    /// Mint a new message with a server-assigned id.
    pub fn new(role: MessageRole, content: MessageContent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, MessageContent::Text(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, MessageContent::Text(content.into()))
    }

    /// Convert to the provider-facing message type.
    pub fn to_llm(&self) -> LLMMessage {
        let content = Content::text(self.content.to_plain_text());
        match self.role {
            MessageRole::System => LLMMessage::System { content, name: None },
            MessageRole::User => LLMMessage::Human { content, name: None },
            MessageRole::Assistant => LLMMessage::AI { content, name: None },
        }
    }
}

/// A message as stored in the `messages` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub chat_id: ObjectId,
    pub user_id: ObjectId,
    pub role: MessageRole,
    pub content: MessageContent,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn from_transcript(
        message: &TranscriptMessage,
        chat_id: ObjectId,
        user_id: ObjectId,
    ) -> Self {
        Self {
            id: message.id.clone(),
            chat_id,
            user_id,
            role: message.role,
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }

    pub fn into_transcript(self) -> TranscriptMessage {
        TranscriptMessage {
            id: self.id,
            role: self.role,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
