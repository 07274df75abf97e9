use anyhow::Context;
use common::Whisper;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

use crate::store::{decode, encode, Collection, Mutation, WhisperStore};

/// Whispers persisted as a JSON array in a single file.
///
/// Every operation reads the whole file. Mutations hold the write lock from
/// the read until the new snapshot has been renamed into place, so two
/// requests can never interleave a read-modify-write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating the file (and its parent
    /// directories) holding `[]` if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let exists = fs::try_exists(&path)
            .await
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if !exists {
            write_atomic(&path, &encode(&[])?).await?;
            tracing::info!(path = %path.display(), "created empty whisper file");
        }

        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> anyhow::Result<Collection> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Collection::new(decode(&bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Collection::default()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", self.path.display()))
            }
        }
    }

    async fn save(&self, collection: &Collection) -> anyhow::Result<()> {
        let bytes = encode(collection.whispers())?;
        write_atomic(&self.path, &bytes).await
    }
}

/// Writes to `<path>.tmp` and renames it over `path`, so readers only ever see
/// a complete snapshot.
async fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));

    fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if let Err(err) = fs::rename(&tmp, path).await {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            tracing::warn!(%cleanup, tmp = %tmp.display(), "failed to remove temporary file");
        }
        return Err(err).with_context(|| format!("failed to replace {}", path.display()));
    }

    Ok(())
}

#[axum::async_trait]
impl WhisperStore for JsonFileStore {
    async fn get_all(&self) -> anyhow::Result<Vec<Whisper>> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.into_whispers())
    }

    async fn get_by_id(&self, id: u64) -> anyhow::Result<Option<Whisper>> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.get(id).cloned())
    }

    async fn create(&self, message: String) -> anyhow::Result<Whisper> {
        let _guard = self.lock.write().await;

        let mut collection = self.load().await?;
        let whisper = collection.create(message)?;
        self.save(&collection).await?;

        tracing::debug!(id = whisper.id, "created whisper");
        Ok(whisper)
    }

    async fn update_by_id(&self, id: u64, message: String) -> anyhow::Result<Mutation> {
        let _guard = self.lock.write().await;

        let mut collection = self.load().await?;
        if collection.update(id, message) == Mutation::NotFound {
            return Ok(Mutation::NotFound);
        }
        self.save(&collection).await?;

        tracing::debug!(id, "updated whisper");
        Ok(Mutation::Applied)
    }

    async fn delete_by_id(&self, id: u64) -> anyhow::Result<Mutation> {
        let _guard = self.lock.write().await;

        let mut collection = self.load().await?;
        if collection.delete(id) == Mutation::NotFound {
            return Ok(Mutation::NotFound);
        }
        self.save(&collection).await?;

        tracing::debug!(id, "deleted whisper");
        Ok(Mutation::Applied)
    }
}
