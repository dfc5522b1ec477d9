//! Authentication flow
//!
//! Submits credentials to the backend. On success the returned access
//! token becomes the active [`Session`] and the view moves to chat. On
//! failure nothing is persisted, the view stays where it was, and the
//! caller receives a non-descriptive [`PalaverError::AuthFailed`]; the
//! underlying cause is logged.
//!
//! Inputs are passed through untouched: no format or length checks happen
//! on the client.

use crate::api::types::{AuthResponse, LoginRequest, SignupRequest, UserProfile};
use crate::api::ChatBackend;
use crate::error::{AuthKind, PalaverError, Result};
use crate::session::Session;

/// Screen the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Landing screen
    #[default]
    Home,
    /// Login form
    Login,
    /// Signup form
    Signup,
    /// Conversation screen
    Chat,
}

/// What a successful login or signup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    /// Profile returned by the backend, if any
    pub user: Option<UserProfile>,
    /// Status text returned by the backend, if any
    pub message: Option<String>,
}

/// Login/signup/logout state holder.
///
/// # Examples
///
/// ```no_run
/// use palaver::api::ApiClient;
/// use palaver::auth::{AuthFlow, View};
/// use palaver::config::ApiConfig;
/// use palaver::session::Session;
///
/// # async fn example() -> palaver::error::Result<()> {
/// let session = Session::in_memory();
/// let client = ApiClient::new(&ApiConfig::default(), session.clone())?;
/// let mut flow = AuthFlow::new(session, View::Login);
///
/// flow.login(&client, "ada@example.com", "secret").await?;
/// assert_eq!(flow.view(), View::Chat);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AuthFlow {
    session: Session,
    view: View,
}

impl AuthFlow {
    /// Starts on `view` with the given session.
    pub fn new(session: Session, view: View) -> Self {
        Self { session, view }
    }

    /// Current view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Session the flow writes to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Logs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`PalaverError::AuthFailed`] with [`AuthKind::Login`] when
    /// the request fails or the token cannot be persisted.
    pub async fn login<B>(&mut self, backend: &B, email: &str, password: &str) -> Result<AuthOutcome>
    where
        B: ChatBackend + ?Sized,
    {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = backend.login(&request).await;
        self.complete(AuthKind::Login, result)
    }

    /// Creates an account and logs in.
    ///
    /// # Errors
    ///
    /// Returns [`PalaverError::AuthFailed`] with [`AuthKind::Signup`] when
    /// the request fails or the token cannot be persisted.
    pub async fn signup<B>(
        &mut self,
        backend: &B,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome>
    where
        B: ChatBackend + ?Sized,
    {
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = backend.signup(&request).await;
        self.complete(AuthKind::Signup, result)
    }

    /// Forgets the session and returns to the landing view.
    pub fn logout(&mut self) -> Result<()> {
        self.session.end()?;
        self.view = View::Home;
        Ok(())
    }

    fn complete(&mut self, kind: AuthKind, result: Result<AuthResponse>) -> Result<AuthOutcome> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} request failed: {}", kind, e);
                return Err(PalaverError::AuthFailed(kind).into());
            }
        };

        if let Err(e) = self.session.begin(&response.tokens.access) {
            tracing::warn!("{} succeeded but the token could not be stored: {}", kind, e);
            return Err(PalaverError::AuthFailed(kind).into());
        }

        self.view = View::Chat;
        tracing::info!("{} succeeded", kind);
        Ok(AuthOutcome {
            user: response.user,
            message: response.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Canned, FakeBackend, FakeCall};

    fn failure_kind(err: &anyhow::Error) -> Option<AuthKind> {
        match err.downcast_ref::<PalaverError>() {
            Some(PalaverError::AuthFailed(kind)) => Some(*kind),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_login_success_persists_token_and_enters_chat() {
        let backend = FakeBackend::offline().issuing_token("access.token.value");
        let session = Session::in_memory();
        let mut flow = AuthFlow::new(session.clone(), View::Login);

        let outcome = flow
            .login(&backend, "ada@example.com", "pw")
            .await
            .unwrap();

        assert_eq!(session.token().as_deref(), Some("access.token.value"));
        assert_eq!(flow.view(), View::Chat);
        assert_eq!(outcome.message.as_deref(), Some("ok"));
        assert_eq!(
            backend.calls(),
            vec![FakeCall::Login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "pw".to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn test_login_failure_persists_nothing_and_stays() {
        let mut backend = FakeBackend::offline();
        backend.login = Canned::Status(401);
        let session = Session::in_memory();
        let mut flow = AuthFlow::new(session.clone(), View::Login);

        let err = flow.login(&backend, "ada@example.com", "bad").await.unwrap_err();

        assert_eq!(failure_kind(&err), Some(AuthKind::Login));
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(session.token(), None);
        assert_eq!(flow.view(), View::Login);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_previous_token() {
        let backend = FakeBackend::offline();
        let session = Session::in_memory();
        session.begin("previous").unwrap();
        let mut flow = AuthFlow::new(session.clone(), View::Login);

        assert!(flow.login(&backend, "a", "b").await.is_err());
        assert_eq!(session.token().as_deref(), Some("previous"));
    }

    #[tokio::test]
    async fn test_signup_success() {
        let backend = FakeBackend::offline().issuing_token("signup.token");
        let session = Session::in_memory();
        let mut flow = AuthFlow::new(session.clone(), View::Signup);

        flow.signup(&backend, "Ada", "ada@example.com", "pw")
            .await
            .unwrap();

        assert_eq!(session.token().as_deref(), Some("signup.token"));
        assert_eq!(flow.view(), View::Chat);
        assert!(matches!(backend.calls()[0], FakeCall::Signup(_)));
    }

    #[tokio::test]
    async fn test_signup_failure() {
        let mut backend = FakeBackend::offline();
        backend.signup = Canned::Status(400);
        let session = Session::in_memory();
        let mut flow = AuthFlow::new(session.clone(), View::Signup);

        let err = flow.signup(&backend, "", "", "").await.unwrap_err();

        assert_eq!(failure_kind(&err), Some(AuthKind::Signup));
        assert_eq!(session.token(), None);
        assert_eq!(flow.view(), View::Signup);
    }

    #[tokio::test]
    async fn test_empty_credentials_are_sent_as_is() {
        let backend = FakeBackend::offline().issuing_token("t");
        let mut flow = AuthFlow::new(Session::in_memory(), View::Login);

        flow.login(&backend, "", "").await.unwrap();

        assert_eq!(
            backend.calls(),
            vec![FakeCall::Login(LoginRequest {
                email: String::new(),
                password: String::new(),
            })]
        );
    }

    #[test]
    fn test_logout_clears_session() {
        let session = Session::in_memory();
        session.begin("tok").unwrap();
        let mut flow = AuthFlow::new(session.clone(), View::Chat);

        flow.logout().unwrap();

        assert_eq!(session.token(), None);
        assert_eq!(flow.view(), View::Home);
    }
}
