use super::KeyValueStore;
use crate::models::{Level, SaveOutcome, SavedWord, VocabularySuggestion};
use crate::{Error, Result};
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Holds the bare JSON array of [`SavedWord`] records.
pub const STORAGE_KEY: &str = "@saved_words";
/// Sibling key carrying the layout version of [`STORAGE_KEY`].
pub const SCHEMA_KEY: &str = "@saved_words:schema";
pub const SCHEMA_VERSION: u32 = 1;

/// Personal vocabulary list, newest first, one entry per case-insensitive
/// word.
///
/// Every mutation reads and rewrites the whole collection. Mutations through
/// one `WordStore` are serialized; two stores sharing a backend are
/// last-write-wins.
pub struct WordStore<S: KeyValueStore> {
    kv: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> WordStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    async fn load(&self) -> Result<Vec<SavedWord>> {
        if let Some(raw) = self.kv.get(SCHEMA_KEY).await? {
            let version: u32 = raw.trim().parse().map_err(|_| {
                Error::Persistence(format!("Unreadable schema version '{}'", raw.trim()))
            })?;
            if version > SCHEMA_VERSION {
                return Err(Error::Persistence(format!(
                    "Saved words use schema version {}, newest supported is {}",
                    version, SCHEMA_VERSION
                )));
            }
        }

        match self.kv.get(STORAGE_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::Persistence(format!("Corrupt saved words: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    /// The collection is written last, so a failed call never leaves the
    /// word stored.
    async fn persist(&self, words: &[SavedWord]) -> Result<()> {
        let json = serde_json::to_string(words)
            .map_err(|e| Error::Persistence(format!("Failed to serialize saved words: {}", e)))?;
        self.kv
            .set(SCHEMA_KEY, &SCHEMA_VERSION.to_string())
            .await?;
        self.kv.set(STORAGE_KEY, &json).await
    }

    /// Most recently saved first. Unreadable data reads as empty.
    pub async fn list(&self) -> Vec<SavedWord> {
        match self.load().await {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!("Failed to load saved words, using empty list: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn exists(&self, word: &str) -> bool {
        self.list().await.iter().any(|w| w.matches_word(word))
    }

    /// Refuses to overwrite stored data it cannot read.
    pub async fn save(&self, word: &str, level: Level, sentence: &str) -> Result<SaveOutcome> {
        let word = word.trim();
        if word.is_empty() {
            return Err(Error::InvalidInput("word must not be empty".to_string()));
        }
        if sentence.trim().is_empty() {
            return Err(Error::InvalidInput("sentence must not be empty".to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let mut words = self.load().await?;

        if let Some(existing) = words.iter().find(|w| w.matches_word(word)) {
            tracing::debug!("'{}' already saved as '{}'", word, existing.word);
            return Ok(SaveOutcome::AlreadySaved(existing.clone()));
        }

        let saved = SavedWord {
            id: Uuid::new_v4().to_string(),
            word: word.to_string(),
            level,
            sentence: sentence.to_string(),
            saved_at: Utc::now(),
        };
        words.insert(0, saved.clone());
        self.persist(&words).await?;

        tracing::info!("Saved word '{}' ({})", saved.word, saved.level);
        Ok(SaveOutcome::Saved(saved))
    }

    /// Promote a suggestion; its conversation starters are not kept.
    pub async fn save_suggestion(&self, suggestion: &VocabularySuggestion) -> Result<SaveOutcome> {
        self.save(&suggestion.word, suggestion.level, &suggestion.sentence)
            .await
    }

    /// Unknown ids are a no-op.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let words = self.load().await?;

        let before = words.len();
        let remaining: Vec<SavedWord> = words.into_iter().filter(|w| w.id != id).collect();
        if remaining.len() == before {
            tracing::debug!("No saved word with id {}", id);
            return Ok(());
        }

        self.persist(&remaining).await?;
        tracing::info!("Removed saved word {}", id);
        Ok(())
    }
}
