//! Palaver - terminal client library for a conversational assistant
//!
//! This library provides the client side of an assistant chat service:
//! session token storage, the HTTP client layer, login/signup, conversation
//! sync and the optimistic message send flow.
//!
//! # Architecture
//!
//! - `session`: token storage backends, the `Session` context and identity
//! - `api`: wire types, the HTTP client and the `ChatBackend` trait
//! - `auth`: login/signup/logout flow and view transitions
//! - `chat`: messages, conversation, sync and send flows
//! - `commands`: CLI command handlers
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use palaver::api::ApiClient;
//! use palaver::auth::{AuthFlow, View};
//! use palaver::chat::{Conversation, ConversationSync, MessageSender};
//! use palaver::config::Config;
//! use palaver::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let session = Session::in_memory();
//!     let client = ApiClient::new(&config.api, session.clone())?;
//!
//!     let mut auth = AuthFlow::new(session.clone(), View::Login);
//!     auth.login(&client, "ada@example.com", "secret").await?;
//!
//!     let mut conversation = Conversation::new();
//!     ConversationSync::new()
//!         .activate(&client, &session, &mut conversation)
//!         .await;
//!     MessageSender::new()
//!         .send(&client, &mut conversation, "Hello")
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use api::{ApiClient, ChatBackend};
pub use auth::{AuthFlow, View};
pub use chat::{Conversation, ConversationSync, Message, MessageSender};
pub use config::Config;
pub use error::{PalaverError, Result};
pub use session::{Identity, Session};
