use super::VocabularyService;
use crate::models::{ConversationFlow, Level, MistakeFix, VocabularySuggestion};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted stand-in for [`super::ModelGateway`]. Configured responses are
/// cycled through in order; with none configured a canned answer is built
/// from the input.
#[derive(Clone, Default)]
pub struct MockVocabularyService {
    vocabulary_responses: Arc<Mutex<Vec<Vec<VocabularySuggestion>>>>,
    flow_responses: Arc<Mutex<Vec<Vec<ConversationFlow>>>>,
    fix_responses: Arc<Mutex<Vec<MistakeFix>>>,
    fail_with_status: Option<u16>,
    call_count: Arc<Mutex<usize>>,
    starters_seen: Arc<Mutex<Vec<String>>>,
}

impl MockVocabularyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary_response(self, response: Vec<VocabularySuggestion>) -> Self {
        self.vocabulary_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_flow_response(self, response: Vec<ConversationFlow>) -> Self {
        self.flow_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_fix_response(self, response: MistakeFix) -> Self {
        self.fix_responses.lock().unwrap().push(response);
        self
    }

    /// Every call fails as if the upstream answered with `status`.
    pub fn failing_with_status(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_starters_seen(&self) -> Vec<String> {
        self.starters_seen.lock().unwrap().clone()
    }

    fn record_call(&self) -> Result<usize> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        match self.fail_with_status {
            Some(status) => Err(Error::UpstreamStatus {
                status,
                body: "mock failure".to_string(),
            }),
            None => Ok(*count),
        }
    }
}

fn pick<T: Clone>(responses: &Mutex<Vec<T>>, count: usize) -> Option<T> {
    let responses = responses.lock().unwrap();
    if responses.is_empty() {
        None
    } else {
        Some(responses[(count - 1) % responses.len()].clone())
    }
}

#[async_trait]
impl VocabularyService for MockVocabularyService {
    async fn extract_vocabulary(&self, image_bytes: &[u8]) -> Result<Vec<VocabularySuggestion>> {
        let count = self.record_call()?;
        if image_bytes.is_empty() {
            return Err(Error::InvalidInput("image payload is empty".to_string()));
        }

        Ok(pick(&self.vocabulary_responses, count).unwrap_or_else(|| {
            Level::ALL
                .iter()
                .map(|level| VocabularySuggestion {
                    word: format!("{}-word", level),
                    level: *level,
                    sentence: format!("A {} sentence.", level),
                    conversation_starters: vec![format!("Tell me about {} words.", level)],
                })
                .collect()
        }))
    }

    async fn predict_responses(&self, starter: &str) -> Result<Vec<ConversationFlow>> {
        let count = self.record_call()?;
        self.starters_seen.lock().unwrap().push(starter.to_string());

        Ok(pick(&self.flow_responses, count).unwrap_or_else(|| {
            (1..=3)
                .map(|i| ConversationFlow {
                    their_response: format!("Reply {} to '{}'", i, starter),
                    your_follow_up: format!("Follow-up {}", i),
                })
                .collect()
        }))
    }

    async fn correct_sentence(&self, text: &str) -> Result<MistakeFix> {
        let count = self.record_call()?;

        Ok(pick(&self.fix_responses, count).unwrap_or_else(|| MistakeFix {
            original: text.to_string(),
            corrected: text.to_string(),
            explanation: "Perfect! No changes needed.".to_string(),
        }))
    }
}
