use super::KeyValueStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One file per key under a data directory. Writes go to a temp file first
/// and are renamed into place, so a crash never leaves a half-written value.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Persistence(format!(
                "Failed to create data directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        tokio::fs::write(&tmp_path, value)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to write {}: {}", tmp_path.display(), e)))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to replace {}: {}", path.display(), e)))?;

        tracing::debug!("Stored {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.get("@saved_words").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(&dir.path().join("nested"));

        store.set("@saved_words", "[]").await.unwrap();
        assert_eq!(
            store.get("@saved_words").await.unwrap(),
            Some("[]".to_string())
        );

        store.set("@saved_words", "[1]").await.unwrap();
        assert_eq!(
            store.get("@saved_words").await.unwrap(),
            Some("[1]".to_string())
        );
    }

    #[tokio::test]
    async fn test_keys_map_to_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());

        store.set("@saved_words", "[]").await.unwrap();
        store.set("@saved_words:schema", "1").await.unwrap();

        assert!(dir.path().join("_saved_words.json").exists());
        assert!(dir.path().join("_saved_words_schema.json").exists());
        assert!(!dir.path().join("_saved_words.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = FileKeyValueStore::new(&blocker);
        let err = store.set("@saved_words", "[]").await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
