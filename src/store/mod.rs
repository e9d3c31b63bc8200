//! Local persistence for saved vocabulary
//!
//! The word store keeps its whole collection under one key of a simple
//! key-value backend that only supports whole-value get/set, mirroring the
//! device storage the app runs on.

pub mod file;
pub mod memory;
pub mod words;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use words::WordStore;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}
