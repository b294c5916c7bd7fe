//! huddle - minimal real-time group chat relay.
//!
//! Clients connect over a WebSocket, submit messages, and receive every
//! message sent to their group, including their own; durable history is
//! served over HTTP for (re)joining clients.

pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use chat::{GroupBroadcaster, SessionContext};
pub use config::Config;
pub use db::{Database, Message, MessageRepository, NewUser, User, UserRepository};
pub use error::{HuddleError, Result};
pub use web::WebServer;
