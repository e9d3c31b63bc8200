//! Validation of completion text against the JSON contract each prompt asks
//! for. The model is instructed to answer with exactly one JSON literal;
//! anything else (leading prose, markdown fences, trailing commentary, wrong
//! arity) is rejected as a whole.

use crate::models::{
    ConversationFlow, Level, MistakeFix, VocabularySuggestion, MAX_CONVERSATION_STARTERS,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const SUGGESTION_COUNT: usize = 3;
pub const FLOW_COUNT: usize = 3;

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedResponse(msg.into())
}

fn parse_literal<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text.trim()).map_err(|e| {
        tracing::warn!("Rejected {} payload: {}\nRaw: {}", what, e, text);
        malformed(format!("{} payload is not the expected JSON: {}", what, e))
    })
}

fn require_text(value: &str, field: &str, index: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(malformed(format!("entry {} has an empty '{}'", index, field)));
    }
    Ok(())
}

fn require_count<T>(items: &[T], expected: usize, what: &str) -> Result<()> {
    if items.len() != expected {
        return Err(malformed(format!(
            "expected {} {}, got {}",
            expected,
            what,
            items.len()
        )));
    }
    Ok(())
}

pub fn vocabulary(text: &str) -> Result<Vec<VocabularySuggestion>> {
    let suggestions: Vec<VocabularySuggestion> = parse_literal(text, "vocabulary")?;
    require_count(&suggestions, SUGGESTION_COUNT, "suggestions")?;

    for (index, suggestion) in suggestions.iter().enumerate() {
        require_text(&suggestion.word, "word", index)?;
        require_text(&suggestion.sentence, "sentence", index)?;

        if suggestion.conversation_starters.len() > MAX_CONVERSATION_STARTERS {
            return Err(malformed(format!(
                "entry {} has {} conversation starters (max {})",
                index,
                suggestion.conversation_starters.len(),
                MAX_CONVERSATION_STARTERS
            )));
        }
        if suggestion
            .conversation_starters
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(malformed(format!(
                "entry {} has an empty conversation starter",
                index
            )));
        }
    }

    for level in Level::ALL {
        let count = suggestions.iter().filter(|s| s.level == level).count();
        if count != 1 {
            return Err(malformed(format!(
                "expected exactly one {} suggestion, got {}",
                level, count
            )));
        }
    }

    Ok(suggestions)
}

pub fn conversation_flows(text: &str) -> Result<Vec<ConversationFlow>> {
    let flows: Vec<ConversationFlow> = parse_literal(text, "conversation")?;
    require_count(&flows, FLOW_COUNT, "conversation flows")?;

    for (index, flow) in flows.iter().enumerate() {
        require_text(&flow.their_response, "theirResponse", index)?;
        require_text(&flow.your_follow_up, "yourFollowUp", index)?;
    }

    Ok(flows)
}

#[derive(Deserialize)]
struct RawMistakeFix {
    original: String,
    corrected: String,
    explanation: String,
}

/// The returned `original` is always the caller's text, not the model's echo.
pub fn mistake_fix(text: &str, original: &str) -> Result<MistakeFix> {
    let raw: RawMistakeFix = parse_literal(text, "correction")?;
    require_text(&raw.corrected, "corrected", 0)?;
    require_text(&raw.explanation, "explanation", 0)?;

    if raw.original.trim() != original.trim() {
        tracing::debug!(
            "Model echoed a different original ({:?}); keeping caller input",
            raw.original
        );
    }

    Ok(MistakeFix {
        original: original.to_string(),
        corrected: raw.corrected,
        explanation: raw.explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const THREE_WORDS: &str = r#"[
      {"word": "cup", "level": "beginner", "sentence": "The cup is full.", "conversationStarters": ["Want a cup?"]},
      {"word": "saucer", "level": "intermediate", "sentence": "Put it on the saucer.", "conversationStarters": []},
      {"word": "porcelain", "level": "advanced", "sentence": "Fine porcelain chips easily."}
    ]"#;

    #[test]
    fn test_vocabulary_accepts_well_formed_array() {
        let suggestions = vocabulary(THREE_WORDS).unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].word, "cup");
        assert_eq!(suggestions[0].conversation_starters, vec!["Want a cup?"]);
        assert_eq!(suggestions[2].level, Level::Advanced);
        assert!(suggestions[2].conversation_starters.is_empty());
    }

    #[test]
    fn test_vocabulary_rejects_surrounding_prose() {
        let text = format!("Sure! Here are your words:\n{}", THREE_WORDS);
        assert!(matches!(vocabulary(&text), Err(Error::MalformedResponse(_))));

        let text = format!("{}\nHope this helps!", THREE_WORDS);
        assert!(matches!(vocabulary(&text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_vocabulary_rejects_markdown_fence() {
        let text = format!("```json\n{}\n```", THREE_WORDS);
        assert!(matches!(vocabulary(&text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_vocabulary_rejects_wrong_arity() {
        let text = r#"[{"word": "cup", "level": "beginner", "sentence": "A cup."}]"#;
        assert!(matches!(vocabulary(text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_vocabulary_rejects_unknown_level() {
        let text = THREE_WORDS.replace("\"advanced\"", "\"expert\"");
        assert!(matches!(vocabulary(&text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_vocabulary_rejects_duplicate_level() {
        let text = THREE_WORDS.replace("\"advanced\"", "\"beginner\"");
        let err = vocabulary(&text).unwrap_err();
        assert!(err.to_string().contains("beginner"));
    }

    #[test]
    fn test_vocabulary_rejects_empty_word() {
        let text = THREE_WORDS.replace("\"cup\"", "\" \"");
        assert!(matches!(vocabulary(&text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_vocabulary_rejects_too_many_starters() {
        let text = THREE_WORDS.replace(r#"["Want a cup?"]"#, r#"["a", "b", "c", "d"]"#);
        assert!(matches!(vocabulary(&text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_vocabulary_rejects_object_instead_of_array() {
        let text = r#"{"word": "cup", "level": "beginner", "sentence": "A cup."}"#;
        assert!(matches!(vocabulary(text), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_conversation_flows_parses_three() {
        let text = r#"[
          {"theirResponse": "Yes please", "yourFollowUp": "Milk or sugar?"},
          {"theirResponse": "No thanks", "yourFollowUp": "Maybe later then."},
          {"theirResponse": "What kind?", "yourFollowUp": "Green or black."}
        ]"#;
        let flows = conversation_flows(text).unwrap();
        assert_eq!(flows.len(), 3);
        assert_eq!(flows[1].their_response, "No thanks");
        assert_eq!(flows[2].your_follow_up, "Green or black.");
    }

    #[test]
    fn test_conversation_flows_rejects_missing_field() {
        let text = r#"[
          {"theirResponse": "Yes please"},
          {"theirResponse": "No thanks", "yourFollowUp": "Later."},
          {"theirResponse": "What kind?", "yourFollowUp": "Green."}
        ]"#;
        assert!(matches!(
            conversation_flows(text),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_mistake_fix_keeps_caller_original() {
        let text = r#"{"original": "i go store", "corrected": "I'm going to the store.", "explanation": "Added the article."}"#;
        let fix = mistake_fix(text, "I go store").unwrap();
        assert_eq!(fix.original, "I go store");
        assert_eq!(fix.corrected, "I'm going to the store.");
        assert!(!fix.is_unchanged());
    }

    #[test]
    fn test_mistake_fix_rejects_array() {
        let text = r#"[{"original": "a", "corrected": "b", "explanation": "c"}]"#;
        assert!(matches!(
            mistake_fix(text, "a"),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_mistake_fix_rejects_empty_explanation() {
        let text = r#"{"original": "a", "corrected": "b", "explanation": ""}"#;
        assert!(matches!(
            mistake_fix(text, "a"),
            Err(Error::MalformedResponse(_))
        ));
    }
}
