//! Session context
//!
//! [`Session`] is the single owner of the access token. It is passed
//! explicitly to the authenticated HTTP client and to the chat flows rather
//! than being reached through ambient global state.
//!
//! Lifecycle:
//!
//! - [`Session::begin`] persists the token after a successful login/signup
//! - [`Session::token`] is read on every authenticated request
//! - [`Session::end`] clears the token on logout

use std::sync::Arc;

use crate::error::Result;

pub mod identity;
pub mod token_store;

pub use identity::{Claims, Identity, UserId};
pub use token_store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};

/// Shared handle to the persisted access token.
///
/// Cloning is cheap; all clones observe the same store.
///
/// # Examples
///
/// ```
/// use palaver::session::{Identity, Session};
///
/// let session = Session::in_memory();
/// assert_eq!(session.token(), None);
/// assert_eq!(session.identity(), Identity::Unauthenticated);
///
/// session.begin("header.payload.sig").unwrap();
/// assert_eq!(session.token().as_deref(), Some("header.payload.sig"));
///
/// session.end().unwrap();
/// assert_eq!(session.token(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Wraps an existing token store.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor for a process-local session.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Builds a session over the store selected in configuration.
    pub fn from_config(config: &crate::config::SessionConfig) -> Result<Self> {
        Ok(Self::new(Arc::from(token_store::from_config(config)?)))
    }

    /// Persists `token` as the active session.
    pub fn begin(&self, token: &str) -> Result<()> {
        self.store.set(token)?;
        tracing::info!("Session started");
        Ok(())
    }

    /// Clears the active session.
    pub fn end(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Session ended");
        Ok(())
    }

    /// Current token, if any.
    ///
    /// A store failure is logged and treated as "no token"; the request then
    /// goes out without credentials and the backend decides.
    pub fn token(&self) -> Option<String> {
        match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// Identity derived from the current token.
    pub fn identity(&self) -> Identity {
        Identity::from_token(self.token().as_deref())
    }

    /// Decoded claims of the current token, if it is a readable JWT.
    pub fn claims(&self) -> Option<Claims> {
        self.token().as_deref().and_then(Claims::decode)
    }
}
