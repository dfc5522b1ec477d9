//! Wire types for the assistant backend
//!
//! Request bodies are serialized as JSON; response bodies tolerate extra
//! fields so that backend additions do not break the client.

use serde::{Deserialize, Serialize};

use crate::chat::message::Direction;

/// Body of `POST users/login/`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Body of `POST users/signup/`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignupRequest {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Token pair returned by login and signup
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access token attached to authenticated requests
    pub access: String,
    /// Refresh token; received but unused by the client
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Public profile returned alongside tokens
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Numeric user id
    pub id: u64,
    /// Username, when the backend exposes it
    #[serde(default)]
    pub username: Option<String>,
    /// Email, when the backend exposes it
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of login and signup
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// Human-readable status, e.g. "Login successful"
    #[serde(default)]
    pub message: Option<String>,
    /// Profile of the authenticated user
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Issued tokens
    pub tokens: TokenPair,
}

/// One stored message as returned by `GET conversations/user/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationRecord {
    /// Row id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Owning user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<u64>,
    /// Creation time as sent by the backend (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Message text
    pub message: String,
    /// Who wrote it
    pub direction: Direction,
}

/// Body of `POST conversations/chat/`
///
/// The user identity is not part of the payload; the backend takes it from
/// the bearer credential.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// Text of the user's message
    pub message: String,
}

/// Response of `POST conversations/chat/`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// The assistant's reply text
    pub message: String,
}
