//! Conversation sync
//!
//! On chat activation the stored history is pulled from the backend and
//! replaces the local [`Conversation`].
//!
//! ```text
//! Idle --activate--> Loading --ok--> Loaded
//!                            \--err-> Failed
//! ```
//!
//! Failures are logged and reported through [`ConversationSync::state`]
//! and [`ConversationSync::last_error`]; they are never returned as errors,
//! and the conversation is left empty.

use crate::api::ChatBackend;
use crate::chat::conversation::Conversation;
use crate::chat::message::Message;
use crate::error::PalaverError;
use crate::session::{Identity, Session};

/// Where a sync currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not yet activated
    Idle,
    /// Request in flight
    Loading,
    /// History received and applied
    Loaded,
    /// No identity, or the request failed
    Failed,
}

/// One-shot history loader for a chat view.
#[derive(Debug)]
pub struct ConversationSync {
    state: SyncState,
    last_error: Option<String>,
}

impl Default for ConversationSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSync {
    /// A sync that has not run yet.
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            last_error: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Description of the most recent failure, if the last run failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Runs the sync once per activation.
    ///
    /// Calling again after the first run does nothing and returns the
    /// existing state; use [`ConversationSync::refresh`] to force a reload.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::api::ApiClient;
    /// use palaver::chat::{Conversation, ConversationSync, SyncState};
    /// use palaver::config::ApiConfig;
    /// use palaver::session::Session;
    ///
    /// # tokio_test::block_on(async {
    /// let session = Session::in_memory();
    /// let client = ApiClient::new(&ApiConfig::default(), session.clone()).unwrap();
    /// let mut conversation = Conversation::new();
    /// let mut sync = ConversationSync::new();
    ///
    /// // No stored token: nothing is fetched.
    /// let state = sync.activate(&client, &session, &mut conversation).await;
    /// assert_eq!(state, SyncState::Failed);
    /// assert!(conversation.is_empty());
    /// # });
    /// ```
    pub async fn activate<B>(
        &mut self,
        backend: &B,
        session: &Session,
        conversation: &mut Conversation,
    ) -> SyncState
    where
        B: ChatBackend + ?Sized,
    {
        if self.state != SyncState::Idle {
            tracing::debug!(state = ?self.state, "Conversation sync already ran");
            return self.state;
        }
        self.run(backend, session, conversation).await
    }

    /// Forces another sync regardless of the current state.
    pub async fn refresh<B>(
        &mut self,
        backend: &B,
        session: &Session,
        conversation: &mut Conversation,
    ) -> SyncState
    where
        B: ChatBackend + ?Sized,
    {
        self.run(backend, session, conversation).await
    }

    async fn run<B>(
        &mut self,
        backend: &B,
        session: &Session,
        conversation: &mut Conversation,
    ) -> SyncState
    where
        B: ChatBackend + ?Sized,
    {
        self.state = SyncState::Loading;
        self.last_error = None;

        let user_id = match session.identity() {
            Identity::Authenticated(user_id) => user_id,
            Identity::Unauthenticated => {
                tracing::warn!("No authenticated identity; skipping conversation fetch");
                conversation.clear();
                self.last_error = Some(PalaverError::Unauthenticated.to_string());
                self.state = SyncState::Failed;
                return self.state;
            }
        };

        match backend.conversation_for_user(&user_id).await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Conversation loaded");
                conversation.replace(records.into_iter().map(Message::from));
                self.state = SyncState::Loaded;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch conversations: {}", e);
                conversation.clear();
                self.last_error = Some(e.to_string());
                self.state = SyncState::Failed;
            }
        }
        self.state
    }
}
