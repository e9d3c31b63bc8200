//! Wiring of the model gateway, practice session and word store behind one
//! handle used by the CLI.

use crate::ai::{ModelGateway, VocabularyService};
use crate::models::{Config, ConversationFlow, MistakeFix, VocabularySuggestion};
use crate::practice::PracticeSession;
use crate::store::{FileKeyValueStore, KeyValueStore, WordStore};
use crate::{Error, Result};
use std::path::Path;
use tracing::info;

pub struct App {
    practice: PracticeSession<Box<dyn VocabularyService>>,
    words: WordStore<Box<dyn KeyValueStore>>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub vocabulary: Box<dyn VocabularyService>,
    pub storage: Box<dyn KeyValueStore>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            practice: PracticeSession::new(services.vocabulary),
            words: WordStore::new(services.storage),
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn from_config(config: Config) -> Self {
        info!("Word store directory: {}", config.data_dir.display());

        Self::with_services(AppServices {
            vocabulary: Box::new(ModelGateway::new(config.gateway)),
            storage: Box::new(FileKeyValueStore::new(&config.data_dir)),
        })
    }

    pub fn new() -> Result<Self> {
        Ok(Self::from_config(Config::from_env()?))
    }

    pub fn words(&self) -> &WordStore<Box<dyn KeyValueStore>> {
        &self.words
    }

    pub async fn extract_from_file(&self, image_path: &Path) -> Result<Vec<VocabularySuggestion>> {
        let bytes = tokio::fs::read(image_path).await.map_err(|e| {
            Error::InvalidInput(format!("Cannot read image {}: {}", image_path.display(), e))
        })?;
        info!("Analyzing {} ({} bytes)", image_path.display(), bytes.len());
        self.practice.service().extract_vocabulary(&bytes).await
    }

    pub async fn predict(&self, starter: &str) -> Result<Vec<ConversationFlow>> {
        self.practice.conversation_flows(starter).await
    }

    pub async fn correct(&self, text: &str) -> Result<Option<MistakeFix>> {
        self.practice.fix_sentence(text).await
    }
}
