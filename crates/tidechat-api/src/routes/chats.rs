use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use tidechat_store::{TranscriptMessage, DEFAULT_LOAD_LIMIT};

use crate::error::{ApiError, ApiResult};
use crate::routes::require_user;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListChatsQuery {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_list_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<i64>,
}

fn parse_chat_id(raw: &str) -> ApiResult<ObjectId> {
    ObjectId::from_str(raw).map_err(|_| ApiError::BadRequest("Invalid chat ID format".to_string()))
}

/// Create a new chat owned by the caller
pub async fn create_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateChatRequest>,
) -> ApiResult<Json<ChatSummary>> {
    let user = require_user(&state, &headers).await?;

    let chat = state.store.create_chat(user.id, req.title).await?;

    Ok(Json(ChatSummary {
        id: chat.id.to_hex(),
        title: chat.title,
        created_at: chat.created_at,
        last_message_at: chat.last_message_at,
    }))
}

/// List the caller's chats, most recently active first
pub async fn list_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListChatsQuery>,
) -> ApiResult<Json<Vec<ChatSummary>>> {
    let user = require_user(&state, &headers).await?;

    let chats = state
        .store
        .list_chats(user.id, query.limit, query.offset)
        .await?;

    Ok(Json(
        chats
            .into_iter()
            .map(|chat| ChatSummary {
                id: chat.id.to_hex(),
                title: chat.title,
                created_at: chat.created_at,
                last_message_at: chat.last_message_at,
            })
            .collect(),
    ))
}

/// Chronological transcript of an owned chat
pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> ApiResult<Json<Vec<TranscriptMessage>>> {
    let user = require_user(&state, &headers).await?;
    let chat_id = parse_chat_id(&chat_id)?;

    // Ownership gate before any content leaves the store
    if state.store.chats().find_owned(chat_id, user.id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Chat {}", chat_id.to_hex())));
    }

    let limit = query.limit.unwrap_or(DEFAULT_LOAD_LIMIT);
    let messages = state.store.load_chat(chat_id, limit).await?;

    Ok(Json(messages))
}

/// Delete an owned chat. The chat record goes synchronously; message cleanup
/// runs in the background.
pub async fn delete_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = require_user(&state, &headers).await?;
    let chat_id = parse_chat_id(&chat_id)?;

    state.store.delete_chat(chat_id, user.id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
