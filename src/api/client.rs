//! HTTP client layer
//!
//! Two request-issuing configurations share one base URL:
//!
//! - **public** -- default headers only (`Content-Type: application/json`);
//!   used for login and signup
//! - **authenticated** -- additionally reads the [`Session`] token on every
//!   request and, when one is present, attaches it as
//!   `Authorization: Bearer <token>`. When no token is present the request
//!   is sent without credentials; the backend is trusted to reject it.
//!
//! Transport errors and non-success statuses propagate to the caller as-is.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::types::{
    AuthResponse, ChatReply, ChatRequest, ConversationRecord, LoginRequest, SignupRequest,
};
use crate::api::ChatBackend;
use crate::config::ApiConfig;
use crate::error::{PalaverError, Result};
use crate::session::{Session, UserId};

const LOGIN_PATH: &[&str] = &["users", "login"];
const SIGNUP_PATH: &[&str] = &["users", "signup"];
const CHAT_PATH: &[&str] = &["conversations", "chat"];

fn conversation_path(user_id: &UserId) -> [&str; 3] {
    ["conversations", "user", user_id.as_str()]
}

/// One configured request issuer.
///
/// # Examples
///
/// ```no_run
/// use palaver::api::client::HttpClient;
/// use palaver::config::ApiConfig;
/// use palaver::session::Session;
///
/// let config = ApiConfig::default();
/// let public = HttpClient::public(&config).unwrap();
/// let authed = HttpClient::authenticated(&config, Session::in_memory()).unwrap();
/// assert!(!public.is_authenticated());
/// assert!(authed.is_authenticated());
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    session: Option<Session>,
}

impl HttpClient {
    /// Builds the unauthenticated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PalaverError::Url`] for an unparsable base URL or
    /// [`PalaverError::Http`] if the underlying client cannot be built.
    pub fn public(config: &ApiConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Builds the configuration that attaches the session's bearer token.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::public`].
    pub fn authenticated(config: &ApiConfig, session: Session) -> Result<Self> {
        Self::build(config, Some(session))
    }

    fn build(config: &ApiConfig, session: Option<Session>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(PalaverError::Http)?;

        Ok(Self {
            http,
            base_url: normalize_base_url(&config.base_url)?,
            session,
        })
    }

    /// `true` for the configuration built with a session.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Base URL all paths are joined onto (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the endpoint made of `segments` under the base URL.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` in a
    /// segment cannot leave it. The result always ends in `/`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PalaverError::Config(format!("Base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body.
    ///
    /// An empty or `null` body decodes to `None`.
    pub async fn get_json<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<Option<R>> {
        let response = self
            .request(Method::GET, segments)?
            .send()
            .await
            .map_err(PalaverError::Http)?;
        let text = Self::success_body(response).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&text).map_err(PalaverError::Serialization)?)
    }

    /// Issues a POST with a JSON body and decodes the JSON response.
    pub async fn post_json<B, R>(&self, segments: &[&str], body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, segments)?
            .json(body)
            .send()
            .await
            .map_err(PalaverError::Http)?;
        let text = Self::success_body(response).await?;
        Ok(serde_json::from_str(&text).map_err(PalaverError::Serialization)?)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let mut req = self.http.request(method.clone(), url.clone());

        let mut attached = false;
        if let Some(session) = &self.session {
            if let Some(token) = session.token() {
                req = req.bearer_auth(token);
                attached = true;
            }
        }

        tracing::debug!(%method, %url, credentials = attached, "Issuing request");
        Ok(req)
    }

    async fn success_body(response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(PalaverError::Http)?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Request returned error status");
            return Err(PalaverError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(body)
    }
}

/// Parses `raw` and guarantees a trailing slash.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(PalaverError::Url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Backend client: public issuer for auth, authenticated issuer for chat.
#[derive(Debug, Clone)]
pub struct ApiClient {
    public: HttpClient,
    authenticated: HttpClient,
}

impl ApiClient {
    /// Builds both configurations against `config.base_url`.
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        Ok(Self {
            public: HttpClient::public(config)?,
            authenticated: HttpClient::authenticated(config, session)?,
        })
    }

    /// The unauthenticated issuer.
    pub fn public(&self) -> &HttpClient {
        &self.public
    }

    /// The authenticated issuer.
    pub fn authenticated(&self) -> &HttpClient {
        &self.authenticated
    }
}

#[async_trait::async_trait]
impl ChatBackend for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.public.post_json(LOGIN_PATH, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        self.public.post_json(SIGNUP_PATH, request).await
    }

    async fn conversation_for_user(&self, user_id: &UserId) -> Result<Vec<ConversationRecord>> {
        let records: Option<Vec<ConversationRecord>> = self
            .authenticated
            .get_json(&conversation_path(user_id))
            .await?;
        Ok(records.unwrap_or_default())
    }

    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.authenticated.post_json(CHAT_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_trailing_slash() {
        let url = normalize_base_url("http://localhost:8000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_normalize_keeps_existing_slash() {
        let url = normalize_base_url("http://localhost:8000/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_normalize_bare_host() {
        let url = normalize_base_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_base_url("::not a url::").is_err());
    }

    fn client_at(base_url: &str) -> HttpClient {
        HttpClient::public(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: None,
        })
        .unwrap()
    }

    #[test]
    fn test_paths_join_under_base() {
        let client = client_at("http://host/api");
        assert_eq!(
            client.endpoint(LOGIN_PATH).unwrap().as_str(),
            "http://host/api/users/login/"
        );
        assert_eq!(
            client
                .endpoint(&conversation_path(&UserId::new("7")))
                .unwrap()
                .as_str(),
            "http://host/api/conversations/user/7/"
        );
    }

    #[test]
    fn test_paths_join_under_bare_host() {
        let client = client_at("http://host:8000");
        assert_eq!(
            client.endpoint(CHAT_PATH).unwrap().as_str(),
            "http://host:8000/conversations/chat/"
        );
    }

    #[test]
    fn test_user_id_cannot_escape_its_segment() {
        let client = client_at("http://host/api/");

        let traversal = client
            .endpoint(&conversation_path(&UserId::new("../../users/login")))
            .unwrap();
        assert_eq!(
            traversal.as_str(),
            "http://host/api/conversations/user/..%2F..%2Fusers%2Flogin/"
        );

        let query = client
            .endpoint(&conversation_path(&UserId::new("1?x=y#frag")))
            .unwrap();
        assert_eq!(query.path(), "/api/conversations/user/1%3Fx=y%23frag/");
        assert_eq!(query.query(), None);
        assert_eq!(query.fragment(), None);
    }

    #[test]
    fn test_public_and_authenticated_configurations() {
        let config = ApiConfig::default();
        let client = ApiClient::new(&config, Session::in_memory()).unwrap();
        assert!(!client.public().is_authenticated());
        assert!(client.authenticated().is_authenticated());
        assert_eq!(
            client.public().base_url(),
            client.authenticated().base_url()
        );
    }
}
