//! Chat-completion request/response payloads (OpenAI-compatible wire format).

use serde::{Deserialize, Serialize};

/// Request body for chat completions.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Message content union: plain text, or multipart text + image input.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatMessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

/// One content segment in multipart message input.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: ChatMessageContent,
}

impl ChatMessage {
    pub fn user(content: ChatMessageContent) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// Top-level chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// Assistant message as returned by the endpoint; `content` may be null.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if present and non-blank.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_message_serializes_openai_shape() {
        let message = ChatMessage::user(ChatMessageContent::Parts(vec![
            MessagePart::Text {
                text: "describe".to_string(),
            },
            MessagePart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/jpeg;base64,AAAA".to_string(),
                },
            },
        ]));

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "describe");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn test_request_uses_max_tokens_and_temperature() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user(ChatMessageContent::Text("hi".to_string()))],
            temperature: 0.5,
            max_tokens: 300,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_first_text_skips_null_and_blank_content() {
        let null_content: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": null }, "finish_reason": "stop" }]
        }))
        .unwrap();
        assert!(null_content.first_text().is_none());

        let blank: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "  " } }]
        }))
        .unwrap();
        assert!(blank.first_text().is_none());

        let empty: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(empty.first_text().is_none());
    }
}
