//! Durable storage for the access/refresh token pair.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use staffdesk_core::error::{AppError, ErrorKind};
use staffdesk_core::result::AppResult;

/// File name of the persisted access token.
const ACCESS_TOKEN_FILE: &str = "access_token";
/// File name of the persisted refresh token.
const REFRESH_TOKEN_FILE: &str = "refresh_token";

/// Trait for token pair persistence backends.
///
/// A store holds at most one access token and one refresh token under
/// fixed keys. `store` replaces the whole pair: passing no refresh token
/// removes any previously persisted one. Pure persistence, no
/// validation; callers drive state recomputation.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Returns the stored access token, if any.
    async fn access_token(&self) -> AppResult<Option<String>>;

    /// Returns the stored refresh token, if any.
    async fn refresh_token(&self) -> AppResult<Option<String>>;

    /// Stores a new token pair, replacing the previous one.
    async fn store(&self, access: &str, refresh: Option<&str>) -> AppResult<()>;

    /// Removes both tokens.
    async fn clear(&self) -> AppResult<()>;
}

/// Token store persisting each token into its own file under a profile
/// directory, so a session survives process restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    /// Directory holding the token files.
    dir: PathBuf,
}

impl FileTokenStore {
    /// Opens a file store rooted at the given directory, creating it if
    /// necessary.
    pub async fn open(dir: &str) -> AppResult<Self> {
        let dir = PathBuf::from(dir);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create session directory: {}", dir.display()),
                e,
            )
        })?;
        Ok(Self { dir })
    }

    async fn read(&self, name: &str) -> AppResult<Option<String>> {
        let path = self.dir.join(name);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read {}", path.display()),
                e,
            )),
        }
    }

    async fn write(&self, name: &str, value: &str) -> AppResult<()> {
        let path = self.dir.join(name);
        fs::write(&path, value).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write {}", path.display()),
                e,
            )
        })
    }

    async fn remove(&self, name: &str) -> AppResult<()> {
        let path = self.dir.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to remove {}", path.display()),
                e,
            )),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn access_token(&self) -> AppResult<Option<String>> {
        self.read(ACCESS_TOKEN_FILE).await
    }

    async fn refresh_token(&self) -> AppResult<Option<String>> {
        self.read(REFRESH_TOKEN_FILE).await
    }

    async fn store(&self, access: &str, refresh: Option<&str>) -> AppResult<()> {
        self.write(ACCESS_TOKEN_FILE, access).await?;
        match refresh {
            Some(refresh) => self.write(REFRESH_TOKEN_FILE, refresh).await?,
            None => self.remove(REFRESH_TOKEN_FILE).await?,
        }
        debug!(
            dir = %self.dir.display(),
            with_refresh = refresh.is_some(),
            "Persisted token pair"
        );
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.remove(ACCESS_TOKEN_FILE).await?;
        self.remove(REFRESH_TOKEN_FILE).await?;
        Ok(())
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredPair>,
}

#[derive(Debug, Default)]
struct StoredPair {
    access: Option<String>,
    refresh: Option<String>,
}

impl MemoryTokenStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a token pair.
    pub fn with_tokens(access: impl Into<String>, refresh: Option<String>) -> Self {
        Self {
            tokens: Mutex::new(StoredPair {
                access: Some(access.into()),
                refresh,
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn access_token(&self) -> AppResult<Option<String>> {
        Ok(self.tokens.lock().await.access.clone())
    }

    async fn refresh_token(&self) -> AppResult<Option<String>> {
        Ok(self.tokens.lock().await.refresh.clone())
    }

    async fn store(&self, access: &str, refresh: Option<&str>) -> AppResult<()> {
        let mut tokens = self.tokens.lock().await;
        tokens.access = Some(access.to_string());
        tokens.refresh = refresh.map(str::to_string);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut tokens = self.tokens.lock().await;
        tokens.access = None;
        tokens.refresh = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trips_a_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::open(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.store("access-1", Some("refresh-1")).await.unwrap();
        assert_eq!(
            store.access_token().await.unwrap(),
            Some("access-1".to_string())
        );
        assert_eq!(
            store.refresh_token().await.unwrap(),
            Some("refresh-1".to_string())
        );

        store.clear().await.unwrap();
        assert_eq!(store.access_token().await.unwrap(), None);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn storing_without_refresh_removes_the_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::open(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.store("access-1", Some("refresh-1")).await.unwrap();
        store.store("access-2", None).await.unwrap();

        assert_eq!(
            store.access_token().await.unwrap(),
            Some("access-2".to_string())
        );
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap().to_string();

        let store = FileTokenStore::open(&path).await.unwrap();
        store.store("access-1", Some("refresh-1")).await.unwrap();
        drop(store);

        let reopened = FileTokenStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.access_token().await.unwrap(),
            Some("access-1".to_string())
        );
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::open(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_round_trips_a_pair() {
        let store = MemoryTokenStore::new();
        store.store("access-1", Some("refresh-1")).await.unwrap();
        assert_eq!(
            store.access_token().await.unwrap(),
            Some("access-1".to_string())
        );

        store.clear().await.unwrap();
        assert_eq!(store.access_token().await.unwrap(), None);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }
}
