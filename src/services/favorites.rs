use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Saved-movies persistence seam
///
/// Stores bare movie-id strings; joining ids back to movie metadata is the
/// caller's job. Injected rather than global so the data core stays testable
/// in isolation.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<String>>;

    async fn contains(&self, id: &str) -> AppResult<bool>;

    /// Adds an id; a no-op if it is already saved
    async fn add(&self, id: &str) -> AppResult<()>;

    /// Removes an id; a no-op if it was never saved
    async fn remove(&self, id: &str) -> AppResult<()>;
}

/// Favorites stored as a JSON array of id strings in a single file
///
/// A missing file reads as an empty list. Writes serialize the whole list;
/// the mutex keeps concurrent read-modify-write cycles from interleaving
/// within this process.
pub struct JsonFavoritesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFavoritesStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_ids(&self) -> AppResult<Vec<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Corrupt favorites file: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_ids(&self, ids: &[String]) -> AppResult<()> {
        let json = serde_json::to_string(ids)
            .map_err(|e| AppError::Internal(format!("Favorites serialization error: {}", e)))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FavoritesStore for JsonFavoritesStore {
    async fn get_all(&self) -> AppResult<Vec<String>> {
        self.read_ids().await
    }

    async fn contains(&self, id: &str) -> AppResult<bool> {
        Ok(self.read_ids().await?.iter().any(|saved| saved == id))
    }

    async fn add(&self, id: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut ids = self.read_ids().await?;
        if !ids.iter().any(|saved| saved == id) {
            ids.push(id.to_string());
            self.write_ids(&ids).await?;
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut ids = self.read_ids().await?;
        let before = ids.len();
        ids.retain(|saved| saved != id);
        if ids.len() != before {
            self.write_ids(&ids).await?;
        }
        Ok(())
    }
}
