use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tempfile::TempDir;

use palaver::config::ApiConfig;
use palaver::session::{FileTokenStore, Session};

/// Builds an unsigned JWT whose payload carries `user_id`.
#[allow(dead_code)]
pub fn jwt_for_user(user_id: u64) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(
            r#"{{"token_type":"access","user_id":{},"exp":1800000000}}"#,
            user_id
        ))
    )
}

/// API config pointing at a mock server, mounted under `/api`.
#[allow(dead_code)]
pub fn api_config(server_uri: &str) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/api", server_uri),
        timeout_seconds: Some(5),
    }
}

/// A session persisted to a file inside a fresh temp dir.
#[allow(dead_code)]
pub fn file_session() -> (Session, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = FileTokenStore::new(tmp.path().join("access_token"));
    (Session::new(Arc::new(store)), tmp)
}
