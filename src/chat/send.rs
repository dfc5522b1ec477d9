//! Message send flow
//!
//! Sending is optimistic: the user's message is appended to the local
//! conversation before the request is issued. A successful reply appends
//! the assistant's message after it. A failed request is logged and the
//! user's message stays in place with no rollback and no error marker.
//!
//! While a request is in flight the sender is `Sending` and further sends
//! are skipped. The guard is advisory only: no cancellation and no request
//! sequencing.

use crate::api::types::{ChatReply, ChatRequest};
use crate::api::ChatBackend;
use crate::chat::conversation::Conversation;
use crate::chat::message::Message;
use crate::error::Result;

/// Whether a send is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    /// Ready to accept input
    Idle,
    /// Waiting for the backend to settle
    Sending,
}

/// Result of one call to [`MessageSender::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty/whitespace input or a send already in flight; nothing changed
    Skipped,
    /// The assistant's reply was appended
    Replied(Message),
    /// The request failed; only the optimistic user message was appended
    Failed(String),
}

/// A send that has been optimistically applied but not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending send must be settled with MessageSender::finish"]
pub struct PendingSend {
    request: ChatRequest,
}

impl PendingSend {
    /// The request to issue.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// Drives user input through the optimistic send protocol.
#[derive(Debug)]
pub struct MessageSender {
    state: SendState,
}

impl Default for MessageSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSender {
    /// An idle sender.
    pub fn new() -> Self {
        Self {
            state: SendState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> SendState {
        self.state
    }

    /// `true` while a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.state == SendState::Sending
    }

    /// Sends `input` and settles the result into `conversation`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use palaver::api::ApiClient;
    /// use palaver::chat::{Conversation, MessageSender, SendOutcome};
    /// use palaver::config::ApiConfig;
    /// use palaver::session::Session;
    ///
    /// # async fn example() -> palaver::error::Result<()> {
    /// let client = ApiClient::new(&ApiConfig::default(), Session::in_memory())?;
    /// let mut conversation = Conversation::new();
    /// let mut sender = MessageSender::new();
    ///
    /// match sender.send(&client, &mut conversation, "Hello").await {
    ///     SendOutcome::Replied(reply) => println!("{}", reply.text()),
    ///     SendOutcome::Failed(e) => eprintln!("send failed: {}", e),
    ///     SendOutcome::Skipped => {}
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send<B>(
        &mut self,
        backend: &B,
        conversation: &mut Conversation,
        input: &str,
    ) -> SendOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let pending = match self.begin(conversation, input) {
            Some(pending) => pending,
            None => return SendOutcome::Skipped,
        };
        let result = backend.send_chat_message(pending.request()).await;
        self.finish(conversation, pending, result)
    }

    /// First half of a send: validates input and appends the user message.
    ///
    /// Returns `None` (and changes nothing) for empty/whitespace input or
    /// while another send is in flight.
    pub fn begin(&mut self, conversation: &mut Conversation, input: &str) -> Option<PendingSend> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.is_sending() {
            tracing::debug!("Send already in flight; ignoring input");
            return None;
        }

        conversation.push(Message::user(trimmed));
        self.state = SendState::Sending;

        Some(PendingSend {
            request: ChatRequest {
                message: trimmed.to_string(),
            },
        })
    }

    /// Second half of a send: applies the backend's answer.
    ///
    /// Always returns the sender to `Idle`.
    pub fn finish(
        &mut self,
        conversation: &mut Conversation,
        pending: PendingSend,
        result: Result<ChatReply>,
    ) -> SendOutcome {
        self.state = SendState::Idle;
        match result {
            Ok(reply) => {
                let message = Message::assistant(reply.message);
                conversation.push(message.clone());
                SendOutcome::Replied(message)
            }
            Err(e) => {
                tracing::warn!(
                    chars = pending.request.message.chars().count(),
                    "Error sending message: {}",
                    e
                );
                SendOutcome::Failed(e.to_string())
            }
        }
    }
}
