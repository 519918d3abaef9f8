pub mod chat;
pub mod message;
pub mod user;

pub use chat::ChatRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
