//! Model gateway: vocabulary extraction, conversation prediction and
//! sentence correction against a hosted chat-completion API.
//!
//! The completion text is expected to be exactly one JSON literal; it is
//! validated into typed records before anything is returned to the caller.

pub mod client;
pub mod gateway;
pub mod mime;
pub mod mock;
pub mod parse;
pub mod types;

pub use gateway::{ModelGateway, TaskProfile};
pub use mock::MockVocabularyService;

use crate::models::{ConversationFlow, MistakeFix, VocabularySuggestion};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VocabularyService: Send + Sync {
    /// Exactly three suggestions, one per difficulty level.
    async fn extract_vocabulary(&self, image_bytes: &[u8]) -> Result<Vec<VocabularySuggestion>>;
    /// Exactly three likely replies to `starter`, each with a follow-up.
    async fn predict_responses(&self, starter: &str) -> Result<Vec<ConversationFlow>>;
    async fn correct_sentence(&self, text: &str) -> Result<MistakeFix>;
}

#[async_trait]
impl<T: VocabularyService + ?Sized> VocabularyService for Box<T> {
    async fn extract_vocabulary(&self, image_bytes: &[u8]) -> Result<Vec<VocabularySuggestion>> {
        (**self).extract_vocabulary(image_bytes).await
    }

    async fn predict_responses(&self, starter: &str) -> Result<Vec<ConversationFlow>> {
        (**self).predict_responses(starter).await
    }

    async fn correct_sentence(&self, text: &str) -> Result<MistakeFix> {
        (**self).correct_sentence(text).await
    }
}
