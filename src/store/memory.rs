use super::KeyValueStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory backend for tests and harnesses. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    failing_keys: Arc<Mutex<Vec<String>>>,
    write_count: Arc<Mutex<usize>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Writes to `key` fail while every other key keeps working.
    pub fn with_failing_key(self, key: &str) -> Self {
        self.failing_keys.lock().unwrap().push(key.to_string());
        self
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn get_write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Persistence(format!("Read failed for {}", key)));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst)
            || self.failing_keys.lock().unwrap().iter().any(|k| k == key)
        {
            return Err(Error::Persistence(format!("Write failed for {}", key)));
        }

        *self.write_count.lock().unwrap() += 1;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
