//! nexa-core: chat session persistence and transcoding
//!
//! This crate provides the conversation storage model for the nexa chat
//! client: the bidirectional transcoder between UI messages and the
//! provider content layout, the session key/value store, the open-session
//! controller, and the session directory backing the history view.

pub mod config;
pub mod directory;
pub mod error;
pub mod generate;
pub mod models;
pub mod prefs;
pub mod session;
pub mod store;
pub mod transcode;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use generate::GeneratedImage;
pub use generate::ReplyGenerator;
pub use models::{Author, Content, InlineData, Message, Part, Role};
pub use session::{ChatSession, SessionState, TurnRequest};
pub use store::{FileStore, MemoryStore, SessionStore};

/// Application name used for config directories and paths.
pub const APP_NAME: &str = "nexa";
