//! Storage port for carrying the session and club across restarts.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

pub const SESSION_KEY: &str = "greenlink_user";
pub const CLUB_KEY: &str = "greenlink_club";

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for storage::Storage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        self.get(key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.put(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        storage::Storage::remove(self, key).await.map(|_| ())
    }
}
