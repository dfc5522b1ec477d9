//! Access token persistence
//!
//! A [`TokenStore`] holds exactly one opaque string: the access token
//! returned by login or signup. Nothing about the token's structure is
//! checked on write, and nothing about its expiry is checked on read.
//!
//! Three backends are provided:
//!
//! - [`FileTokenStore`] -- a plain file in the user's data directory
//! - [`KeyringTokenStore`] -- the OS native credential store (Keychain on
//!   macOS, Secret Service on Linux, Windows Credential Manager on Windows)
//! - [`MemoryTokenStore`] -- process-local, used by tests

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tempfile::NamedTempFile;

use crate::config::{SessionConfig, TokenStoreKind};
use crate::error::{PalaverError, Result};

/// Well-known key the access token is stored under.
pub const TOKEN_KEY: &str = "access_token";

/// Keyring service name shared by all Palaver entries.
const KEYRING_SERVICE: &str = "palaver";

// ---------------------------------------------------------------------------
// TokenStore
// ---------------------------------------------------------------------------

/// Storage for a single access token string.
///
/// # Examples
///
/// ```
/// use palaver::session::token_store::{MemoryTokenStore, TokenStore};
///
/// let store = MemoryTokenStore::new();
/// assert_eq!(store.get().unwrap(), None);
///
/// store.set("abc.def.ghi").unwrap();
/// assert_eq!(store.get().unwrap(), Some("abc.def.ghi".to_string()));
///
/// store.clear().unwrap();
/// assert_eq!(store.get().unwrap(), None);
/// ```
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Returns the stored token, or `None` when nothing is stored.
    fn get(&self) -> Result<Option<String>>;

    /// Persists `token`, replacing any previous value.
    fn set(&self, token: &str) -> Result<()>;

    /// Removes the stored token. A no-op when nothing is stored.
    fn clear(&self) -> Result<()>;
}

/// Builds the token store selected by `config`.
///
/// # Errors
///
/// Returns [`PalaverError::TokenStore`] when the file backend is selected
/// without an explicit path and no data directory can be determined.
pub fn from_config(config: &SessionConfig) -> Result<Box<dyn TokenStore>> {
    let store: Box<dyn TokenStore> = match config.store {
        TokenStoreKind::File => match &config.token_path {
            Some(path) => Box::new(FileTokenStore::new(path)),
            None => Box::new(FileTokenStore::in_data_dir()?),
        },
        TokenStoreKind::Keyring => Box::new(KeyringTokenStore::new()),
        TokenStoreKind::Memory => Box::new(MemoryTokenStore::new()),
    };
    tracing::debug!(?store, "Token store selected");
    Ok(store)
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Token persisted as the entire contents of one file.
///
/// The file is created owner-only (`0600` on unix). A trailing line ending
/// is ignored on read so hand-edited files work; nothing else is stripped.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by `path`. No I/O happens until first use.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at `<data dir>/access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`PalaverError::TokenStore`] when the platform has no
    /// resolvable home/data directory.
    pub fn in_data_dir() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "palaver", "palaver").ok_or_else(|| {
            PalaverError::TokenStore("Could not determine data directory".to_string())
        })?;
        Ok(Self::new(proj_dirs.data_dir().join(TOKEN_KEY)))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim_end_matches(['\r', '\n']);
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PalaverError::Io(e).into()),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(PalaverError::Io)?;

        // Written owner-only next to the target, then renamed over it. The
        // rename replaces whatever sits at the path, symlinks included.
        let mut tmp = NamedTempFile::new_in(parent).map_err(PalaverError::Io)?;
        restrict_permissions(tmp.path())?;
        tmp.write_all(token.as_bytes()).map_err(PalaverError::Io)?;
        tmp.as_file().sync_all().map_err(PalaverError::Io)?;
        tmp.persist(&self.path).map_err(|e| PalaverError::Io(e.error))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PalaverError::Io(e).into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(PalaverError::Io)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// KeyringTokenStore
// ---------------------------------------------------------------------------

/// Token persisted in the OS keyring under service `palaver`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl KeyringTokenStore {
    /// Creates a store using the default service and the well-known key.
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, TOKEN_KEY)
    }

    /// Creates a store under a custom service/account pair.
    pub fn with_names(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| PalaverError::Keyring(e).into())
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(PalaverError::Keyring(e).into()),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(PalaverError::Keyring)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(PalaverError::Keyring(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Token held in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|e| PalaverError::TokenStore(format!("lock poisoned: {}", e)).into())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
