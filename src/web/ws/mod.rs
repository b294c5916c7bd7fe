//! WebSocket module for the real-time channel.

pub mod chat;
pub mod messages;

pub use chat::chat_ws_handler;
pub use messages::{ClientMessage, ServerMessage};
