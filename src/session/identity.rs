//! User identity derived from the access token's embedded claims
//!
//! The access token is a JWT. Its payload segment carries a `user_id`
//! claim that keys conversation retrieval. Decoding never fails loudly:
//! a missing or malformed token simply yields [`Identity::Unauthenticated`].
//! The signature is not verified; that is the backend's job.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Identifier of the authenticated principal, as carried in the token.
///
/// The backend issues numeric ids but the claim is kept as text so that it
/// can be placed into a URL path unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No usable token is present.
    Unauthenticated,
    /// Token decoded and carried a `user_id` claim.
    Authenticated(UserId),
}

impl Identity {
    /// Derives the identity from an optional token.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::session::identity::Identity;
    ///
    /// assert_eq!(Identity::from_token(None), Identity::Unauthenticated);
    /// assert_eq!(Identity::from_token(Some("garbage")), Identity::Unauthenticated);
    /// ```
    pub fn from_token(token: Option<&str>) -> Self {
        match token.and_then(Claims::decode).and_then(|c| c.user_id) {
            Some(id) => Identity::Authenticated(id),
            None => Identity::Unauthenticated,
        }
    }

    /// Returns the user id when authenticated.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Identity::Authenticated(id) => Some(id),
            Identity::Unauthenticated => None,
        }
    }

    /// `true` when a user id could be derived.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// Claims read from a token payload.
///
/// Only the fields the client uses are decoded; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// `user_id` claim
    pub user_id: Option<UserId>,
    /// `exp` claim converted to UTC
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    exp: Option<i64>,
}

impl Claims {
    /// Decodes the payload segment of a JWT.
    ///
    /// Returns `None` when the token does not have three segments or the
    /// payload is not base64url JSON.
    pub fn decode(token: &str) -> Option<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
            _ => {
                tracing::debug!("Token is not a three-segment JWT");
                return None;
            }
        };

        let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Token payload is not base64url: {}", e);
                return None;
            }
        };

        let raw: RawClaims = match serde_json::from_slice(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Token payload is not JSON claims: {}", e);
                return None;
            }
        };

        let user_id = match raw.user_id {
            Some(serde_json::Value::Number(n)) => Some(UserId::new(n.to_string())),
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(UserId::new(s)),
            Some(other) => {
                tracing::debug!("Unsupported user_id claim type: {}", other);
                None
            }
            None => None,
        };

        Some(Self {
            user_id,
            expires_at: raw.exp.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }
}
