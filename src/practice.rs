//! Transient state for one results screen: predicted conversation flows
//! cached per starter, and sentence fixing that ignores blank input.

use crate::ai::VocabularyService;
use crate::models::{ConversationFlow, MistakeFix};
use crate::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub struct PracticeSession<S: VocabularyService> {
    service: S,
    flows: Mutex<HashMap<String, Vec<ConversationFlow>>>,
}

impl<S: VocabularyService> PracticeSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            flows: Mutex::new(HashMap::new()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Flows for `starter`, requested at most once per session. Failures are
    /// not cached, so the caller can simply ask again.
    pub async fn conversation_flows(&self, starter: &str) -> Result<Vec<ConversationFlow>> {
        if let Some(flows) = self.flows.lock().await.get(starter) {
            return Ok(flows.clone());
        }

        let flows = self.service.predict_responses(starter).await?;
        self.flows
            .lock()
            .await
            .insert(starter.to_string(), flows.clone());
        Ok(flows)
    }

    pub async fn cached_flows(&self, starter: &str) -> Option<Vec<ConversationFlow>> {
        self.flows.lock().await.get(starter).cloned()
    }

    /// `Ok(None)` for blank input; the service is not called.
    pub async fn fix_sentence(&self, text: &str) -> Result<Option<MistakeFix>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.service.correct_sentence(text).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockVocabularyService;

    #[tokio::test]
    async fn test_flows_are_requested_once_per_starter() {
        let session = PracticeSession::new(MockVocabularyService::new());

        let first = session.conversation_flows("Is this seat taken?").await.unwrap();
        let again = session.conversation_flows("Is this seat taken?").await.unwrap();
        session.conversation_flows("Nice weather!").await.unwrap();

        assert_eq!(first, again);
        assert_eq!(session.service().get_call_count(), 2);
        assert_eq!(
            session.service().get_starters_seen(),
            vec!["Is this seat taken?".to_string(), "Nice weather!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let session = PracticeSession::new(MockVocabularyService::new().failing_with_status(500));

        assert!(session.conversation_flows("Hello").await.is_err());
        assert!(session.cached_flows("Hello").await.is_none());
        assert!(session.conversation_flows("Hello").await.is_err());
        assert_eq!(session.service().get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_sentence_skips_service() {
        let session = PracticeSession::new(MockVocabularyService::new());

        assert!(session.fix_sentence("   \n").await.unwrap().is_none());
        assert_eq!(session.service().get_call_count(), 0);

        let fix = session.fix_sentence("  I like tea. ").await.unwrap().unwrap();
        assert_eq!(fix.original, "I like tea.");
        assert_eq!(session.service().get_call_count(), 1);
    }
}
