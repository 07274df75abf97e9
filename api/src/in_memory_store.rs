use common::Whisper;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::{Collection, Mutation, WhisperStore};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    whispers: Arc<RwLock<Collection>>,
}

impl InMemoryStore {
    pub fn with_whispers(whispers: Vec<Whisper>) -> Self {
        Self {
            whispers: Arc::new(RwLock::new(Collection::new(whispers))),
        }
    }
}

#[axum::async_trait]
impl WhisperStore for InMemoryStore {
    async fn get_all(&self) -> anyhow::Result<Vec<Whisper>> {
        Ok(self.whispers.read().await.whispers().to_vec())
    }

    async fn get_by_id(&self, id: u64) -> anyhow::Result<Option<Whisper>> {
        Ok(self.whispers.read().await.get(id).cloned())
    }

    async fn create(&self, message: String) -> anyhow::Result<Whisper> {
        self.whispers.write().await.create(message)
    }

    async fn update_by_id(&self, id: u64, message: String) -> anyhow::Result<Mutation> {
        Ok(self.whispers.write().await.update(id, message))
    }

    async fn delete_by_id(&self, id: u64) -> anyhow::Result<Mutation> {
        Ok(self.whispers.write().await.delete(id))
    }
}
