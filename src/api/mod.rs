//! Backend API access
//!
//! [`ChatBackend`] is the seam between the flows (auth, sync, send) and the
//! network. [`client::ApiClient`] implements it over HTTP; tests substitute
//! [`fake::FakeBackend`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Method | Path | Client |
//! |---|---|---|
//! | POST | `users/login/` | public |
//! | POST | `users/signup/` | public |
//! | GET | `conversations/user/{id}/` | authenticated |
//! | POST | `conversations/chat/` | authenticated |

use crate::error::Result;
use crate::session::UserId;

pub mod client;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::ApiClient;
pub use types::{
    AuthResponse, ChatReply, ChatRequest, ConversationRecord, LoginRequest, SignupRequest,
};

/// Operations the client performs against the assistant backend.
///
/// Failures are returned uninterpreted: no retry, no backoff, no mapping of
/// status codes beyond what the implementation reports.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Exchange credentials for tokens.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    /// Create an account and receive tokens.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse>;

    /// Fetch the stored conversation of `user_id`, oldest first.
    async fn conversation_for_user(&self, user_id: &UserId) -> Result<Vec<ConversationRecord>>;

    /// Send one user message and receive the assistant's reply.
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply>;
}
