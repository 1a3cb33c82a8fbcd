pub mod guard;

pub use guard::{post_login_destination, GuardDecision, SessionGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{AdminError, Result};

/// Persistent storage for the single session token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token kept in a JSON file, e.g. `~/.config/fu-admin/session.json`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let stored: StoredSession = serde_json::from_str(&content)?;
        if stored.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(stored.token))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Process-local token store
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        self.token
            .lock()
            .map(|t| t.clone())
            .map_err(|_| AdminError::session("token store lock poisoned"))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| AdminError::session("token store lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| AdminError::session("token store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// The signed-in administrator as reported by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrentUser {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Administrator")
    }
}

/// Shared session handle: the token store plus the process-wide "who am I" context.
///
/// Cloning is cheap; every clone sees the same token and user.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Box<dyn TokenStore>,
    user: RwLock<Option<CurrentUser>>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store: Box::new(store),
                user: RwLock::new(None),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Stored token, or `None` when absent or unreadable (fail closed)
    pub fn token(&self) -> Option<String> {
        match self.inner.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read session token, treating as signed out: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) -> Result<()> {
        self.inner.store.save(token)?;
        self.forget_user();
        tracing::info!("Session token stored");
        Ok(())
    }

    /// Clears the token and the cached user. Storage errors are logged, never raised,
    /// since a forced logout must not fail.
    pub fn sign_out(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!("Failed to clear session token: {}", e);
        }
        self.forget_user();
        tracing::info!("Session cleared");
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.inner.user.read().ok().and_then(|u| u.clone())
    }

    /// Returns the cached user, loading it once through `load` when nothing is cached yet
    pub async fn current_user_or_load<F, Fut>(&self, load: F) -> Result<Option<CurrentUser>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<CurrentUser>>>,
    {
        if let Some(user) = self.current_user() {
            return Ok(Some(user));
        }

        let loaded = load().await?;
        if let Some(user) = &loaded {
            if let Ok(mut slot) = self.inner.user.write() {
                *slot = Some(user.clone());
            }
        }
        Ok(loaded)
    }

    fn forget_user(&self) {
        if let Ok(mut slot) = self.inner.user.write() {
            *slot = None;
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
