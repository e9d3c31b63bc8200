use super::client::ChatCompletionsHttpClient;
use super::mime::image_data_url;
use super::parse;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, ImageUrl, MessagePart};
use super::VocabularyService;
use crate::models::{ConversationFlow, GatewayConfig, MistakeFix, VocabularySuggestion};
use crate::{prompts, Error, Result};
use async_trait::async_trait;

/// Model and sampling settings for one kind of request.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskProfile {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl TaskProfile {
    pub fn extraction(model: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    pub fn prediction(model: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: 0.8,
            max_tokens: 400,
        }
    }

    pub fn correction(model: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 300,
        }
    }
}

/// Talks to the hosted chat-completion endpoint for all three vocabulary
/// tasks. Each call is a single attempt; nothing is cached or retried.
pub struct ModelGateway {
    http: Option<ChatCompletionsHttpClient>,
    extraction: TaskProfile,
    prediction: TaskProfile,
    correction: TaskProfile,
}

impl ModelGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: GatewayConfig, client: reqwest::Client) -> Self {
        tracing::info!(
            "Model gateway configured (credential present: {}, vision model: {}, text model: {})",
            config.has_api_key(),
            config.vision_model,
            config.text_model
        );

        let http = config.api_key.map(|api_key| {
            ChatCompletionsHttpClient::new_with_client(
                api_key,
                config.base_url.clone(),
                config.timeout,
                client,
            )
        });

        Self {
            http,
            extraction: TaskProfile::extraction(&config.vision_model),
            prediction: TaskProfile::prediction(&config.text_model),
            correction: TaskProfile::correction(&config.text_model),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.http.is_some()
    }

    fn http(&self) -> Result<&ChatCompletionsHttpClient> {
        self.http.as_ref().ok_or_else(|| {
            Error::Configuration(
                "GROQ_API_KEY is not configured; set it in the environment or a .env file"
                    .to_string(),
            )
        })
    }

    async fn complete(
        &self,
        http: &ChatCompletionsHttpClient,
        profile: &TaskProfile,
        content: ChatMessageContent,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: profile.model.clone(),
            messages: vec![ChatMessage::user(content)],
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        };

        let response = http.chat_completion(&request).await?;

        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            if reason != "stop" {
                tracing::warn!("Completion finished with reason '{}'", reason);
            }
        }

        let text = response
            .first_text()
            .ok_or_else(|| Error::MalformedResponse("No content in completion".to_string()))?;

        tracing::debug!("Raw completion ({}): {}", profile.model, text);
        Ok(text.to_string())
    }
}

fn require_non_blank(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(())
}

#[async_trait]
impl VocabularyService for ModelGateway {
    async fn extract_vocabulary(&self, image_bytes: &[u8]) -> Result<Vec<VocabularySuggestion>> {
        let http = self.http()?;
        if image_bytes.is_empty() {
            return Err(Error::InvalidInput("image payload is empty".to_string()));
        }

        tracing::debug!("Extracting vocabulary from image ({} bytes)", image_bytes.len());

        let content = ChatMessageContent::Parts(vec![
            MessagePart::Text {
                text: prompts::VOCABULARY.to_string(),
            },
            MessagePart::ImageUrl {
                image_url: ImageUrl {
                    url: image_data_url(image_bytes),
                },
            },
        ]);

        let text = self.complete(http, &self.extraction, content).await?;
        let suggestions = parse::vocabulary(&text)?;

        tracing::info!(
            "Extracted vocabulary: {}",
            suggestions
                .iter()
                .map(|s| s.word.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(suggestions)
    }

    async fn predict_responses(&self, starter: &str) -> Result<Vec<ConversationFlow>> {
        let http = self.http()?;
        require_non_blank(starter, "conversation starter")?;

        let content = ChatMessageContent::Text(prompts::conversation(starter.trim()));
        let text = self.complete(http, &self.prediction, content).await?;
        parse::conversation_flows(&text)
    }

    async fn correct_sentence(&self, text: &str) -> Result<MistakeFix> {
        let http = self.http()?;
        require_non_blank(text, "sentence")?;

        let content = ChatMessageContent::Text(prompts::correction(text));
        let completion = self.complete(http, &self.correction, content).await?;
        parse::mistake_fix(&completion, text)
    }
}
