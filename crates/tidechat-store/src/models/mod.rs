mod chat;
mod message;
mod user;

pub use chat::Chat;
pub use message::{MessageRecord, TranscriptMessage, MessageRole, MessageContent, MessagePart, AudioData};
pub use user::User;
