use axum::{
    extract::State,
    http::HeaderMap,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use tidechat_llm::{ChatOptions, ChatRequest, StreamEvent};
use tidechat_store::{reconcile, TranscriptMessage};

use crate::error::{ApiError, ApiResult};
use crate::routes::require_user;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub id: String,
    pub messages: Vec<TranscriptMessage>,
}

/// What the drained stream contributes to the transcript. Only a turn that
/// reached its finish event yields an assistant message; a stream that
/// errored mid-way persists nothing beyond the user's side of the turn.
pub fn turn_output(accumulated: String, finished: bool) -> Vec<String> {
    if finished && !accumulated.is_empty() {
        vec![accumulated]
    } else {
        Vec::new()
    }
}

/// One chat turn: reconcile the submitted messages with stored history, stream
/// the model's answer back as Server-Sent Events, and persist the finished
/// turn without blocking the stream.
pub async fn chat_turn(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChatTurnRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let user = require_user(&state, &headers).await?;

    let chat_id = ObjectId::from_str(&req.id)
        .map_err(|_| ApiError::BadRequest("Invalid chat ID format".to_string()))?;

    // Ownership gate before any stored history is read back
    if state.store.chats().find_owned(chat_id, user.id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Chat {}", chat_id.to_hex())));
    }

    // Expand a single-message submission against stored history; a longer
    // submission is the client's full local state and is trusted as-is.
    let full_messages = state
        .store
        .reconciler()
        .expand_for_context(chat_id, req.messages)
        .await?;

    let llm_messages = full_messages.iter().map(|m| m.to_llm()).collect();
    let mut options = ChatOptions::new();
    if let Some(temp) = state.config.llm.temperature {
        options = options.temperature(temp);
    }
    let request = ChatRequest::new(state.config.llm.model.clone(), llm_messages)
        .with_options(options);

    let mut upstream = state
        .llm_client
        .chat_stream(request)
        .await
        .map_err(ApiError::Internal)?;

    let (tx, rx) = mpsc::channel::<Result<StreamEvent, String>>(64);
    let store = Arc::clone(&state.store);
    let user_id = user.id;

    // Drain the provider stream to completion even if the client goes away:
    // send failures are ignored, the accumulator keeps running, and the
    // finished turn is still persisted.
    tokio::spawn(async move {
        let mut accumulated = String::new();
        let mut finished = false;

        while let Some(event) = upstream.next().await {
            match event {
                Ok(StreamEvent::Message { content }) => {
                    accumulated.push_str(&content);
                    let _ = tx.send(Ok(StreamEvent::Message { content })).await;
                }
                Ok(done @ StreamEvent::Done { .. }) => {
                    finished = true;
                    let _ = tx.send(Ok(done)).await;
                }
                Err(e) => {
                    tracing::error!("Generation stream error for chat {}: {}", chat_id, e);
                    let _ = tx.send(Err(e.to_string())).await;
                    break;
                }
            }
        }

        // Persist the turn: fold the finished response into the transcript
        // and append idempotently. Failures are logged, never surfaced — the
        // caller already has their answer.
        let merged =
            reconcile::fold_response(full_messages, turn_output(accumulated, finished));

        if let Err(e) = store.save_chat(chat_id, &merged, user_id).await {
            tracing::error!("Failed to persist turn for chat {}: {}", chat_id, e);
        }
    });

    let sse_stream = ReceiverStream::new(rx).map(|event| {
        let sse_event = match event {
            Ok(StreamEvent::Message { content }) => Event::default()
                .event("message")
                .json_data(serde_json::json!({ "content": content })),
            Ok(StreamEvent::Done { finish_reason }) => Event::default()
                .event("done")
                .json_data(serde_json::json!({
                    "status": "completed",
                    "finish_reason": finish_reason,
                })),
            Err(message) => Event::default()
                .event("error")
                .json_data(serde_json::json!({ "error": message })),
        };

        Ok::<Event, Infallible>(sse_event.unwrap_or_else(|_| Event::default().event("error")))
    });

    Ok(Sse::new(sse_stream))
}
