use async_trait::async_trait;
use std::fmt::Debug;

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Durable string key-value storage. No transactions, no range queries.
#[async_trait]
pub trait StorageBackend: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    async fn set(&self, key: &str, value: String) -> Result<(), BackendError>;

    /// Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<(), BackendError>;
}
