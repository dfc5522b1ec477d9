//! In-process fake backend for unit tests
//!
//! [`FakeBackend`] implements [`ChatBackend`] from canned responses and
//! records every call so tests can assert on what the flows sent.
//!
//! Each endpoint holds a [`Canned`] value:
//!
//! - `Canned::Ok(value)` -- returned on every call
//! - `Canned::Status(code)` -- fails with [`PalaverError::Status`]
//! - `Canned::Network` -- fails with a connection-refused I/O error

use std::sync::Mutex;

use crate::api::types::{
    AuthResponse, ChatReply, ChatRequest, ConversationRecord, LoginRequest, SignupRequest,
    TokenPair,
};
use crate::api::ChatBackend;
use crate::error::{PalaverError, Result};
use crate::session::UserId;

/// Scripted outcome of one endpoint.
#[derive(Debug, Clone)]
pub enum Canned<T> {
    /// Succeed with this value
    Ok(T),
    /// Fail with an HTTP status
    Status(u16),
    /// Fail as if the connection were refused
    Network,
}

impl<T: Clone> Canned<T> {
    fn resolve(&self) -> Result<T> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::Status(status) => Err(PalaverError::Status {
                status: *status,
                body: String::new(),
            }
            .into()),
            Canned::Network => Err(PalaverError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
            .into()),
        }
    }
}

/// A request the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Login(LoginRequest),
    Signup(SignupRequest),
    Conversation(UserId),
    Chat(ChatRequest),
}

/// Canned-response implementation of [`ChatBackend`].
#[derive(Debug)]
pub struct FakeBackend {
    pub login: Canned<AuthResponse>,
    pub signup: Canned<AuthResponse>,
    pub conversation: Canned<Vec<ConversationRecord>>,
    pub chat: Canned<ChatReply>,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeBackend {
    /// A backend where every endpoint fails with a network error.
    pub fn offline() -> Self {
        Self {
            login: Canned::Network,
            signup: Canned::Network,
            conversation: Canned::Network,
            chat: Canned::Network,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Auth endpoints succeed with `access`.
    pub fn issuing_token(mut self, access: &str) -> Self {
        let response = auth_response(access);
        self.login = Canned::Ok(response.clone());
        self.signup = Canned::Ok(response);
        self
    }

    /// Chat endpoint replies with `reply`.
    pub fn replying(mut self, reply: &str) -> Self {
        self.chat = Canned::Ok(ChatReply {
            message: reply.to_string(),
        });
        self
    }

    /// Conversation endpoint returns `records`.
    pub fn with_history(mut self, records: Vec<ConversationRecord>) -> Self {
        self.conversation = Canned::Ok(records);
        self
    }

    /// Everything received so far, in order.
    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: FakeCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

/// Minimal successful auth body carrying `access`.
pub fn auth_response(access: &str) -> AuthResponse {
    AuthResponse {
        message: Some("ok".to_string()),
        user: None,
        tokens: TokenPair {
            access: access.to_string(),
            refresh: None,
        },
    }
}

#[async_trait::async_trait]
impl ChatBackend for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.record(FakeCall::Login(request.clone()));
        self.login.resolve()
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        self.record(FakeCall::Signup(request.clone()));
        self.signup.resolve()
    }

    async fn conversation_for_user(&self, user_id: &UserId) -> Result<Vec<ConversationRecord>> {
        self.record(FakeCall::Conversation(user_id.clone()));
        self.conversation.resolve()
    }

    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.record(FakeCall::Chat(request.clone()));
        self.chat.resolve()
    }
}
