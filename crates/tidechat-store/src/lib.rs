pub mod models;
pub mod repositories;
pub mod reconcile;
pub mod client;
pub mod error;
pub mod builder;

pub use models::{Chat, MessageRecord, TranscriptMessage, MessageRole, MessageContent, MessagePart, User};
pub use repositories::{ChatRepository, MessageRepository, UserRepository};
pub use reconcile::{TurnReconciler, ContextPlan, plan_context, fold_response, merge_with_history};
pub use client::{StoreClient, partition_new};
pub use error::StoreError;
pub use builder::StoreClientBuilder;

/// Default cap on messages returned by a transcript load.
pub const DEFAULT_LOAD_LIMIT: i64 = 100;

/// Smaller cap used when loading history as generation context.
pub const CONTEXT_LOAD_LIMIT: i64 = 50;
