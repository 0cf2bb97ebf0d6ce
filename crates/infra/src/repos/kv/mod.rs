mod file;
mod inmemory;

pub use file::FileKVRepo;
pub use inmemory::InMemoryKVRepo;

/// Durable string key value store, the persisted preferences of the app
#[async_trait::async_trait]
pub trait IKVRepo: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// `None` when nothing has been stored under the key
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
