//! Data models and structures
//!
//! Defines the vocabulary records produced by the model gateway, the saved
//! word records kept by the word store, and process configuration.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const MAX_CONVERSATION_STARTERS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(Error::InvalidInput(format!(
                "Unknown level '{}'. Expected beginner, intermediate or advanced",
                other
            ))),
        }
    }
}

/// One word suggested for a photographed object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VocabularySuggestion {
    pub word: String,
    pub level: Level,
    pub sentence: String,
    #[serde(default)]
    pub conversation_starters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationFlow {
    pub their_response: String,
    pub your_follow_up: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MistakeFix {
    pub original: String,
    pub corrected: String,
    pub explanation: String,
}

impl MistakeFix {
    /// True when the model left the sentence as written.
    pub fn is_unchanged(&self) -> bool {
        self.original.trim() == self.corrected.trim()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedWord {
    pub id: String,
    pub word: String,
    pub level: Level,
    pub sentence: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedWord {
    /// Case-insensitive, ignoring surrounding whitespace on either side.
    pub fn matches_word(&self, word: &str) -> bool {
        self.word.trim().to_lowercase() == word.trim().to_lowercase()
    }
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SavedWord),
    /// A case-insensitive match was already stored; nothing was written.
    AlreadySaved(SavedWord),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    pub fn word(&self) -> &SavedWord {
        match self {
            SaveOutcome::Saved(w) | SaveOutcome::AlreadySaved(w) => w,
        }
    }
}

// Configuration
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_TEXT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const APP_DIR_NAME: &str = "snap-vocab";

/// Everything the model gateway needs, injected at construction.
#[derive(Clone)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub vision_model: String,
    pub text_model: String,
    pub timeout: Duration,
}

// The key itself never reaches logs, only whether one is set.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key_present", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut gateway = GatewayConfig::new(std::env::var("GROQ_API_KEY").ok());

        if let Ok(base_url) = std::env::var("GROQ_BASE_URL") {
            gateway = gateway.with_base_url(base_url);
        }
        if let Ok(model) = std::env::var("VISION_MODEL") {
            gateway.vision_model = model;
        }
        if let Ok(model) = std::env::var("TEXT_MODEL") {
            gateway.text_model = model;
        }
        if let Ok(raw) = std::env::var("REQUEST_TIMEOUT_SECS") {
            let secs = parse_timeout_secs(&raw)?;
            gateway = gateway.with_timeout(Duration::from_secs(secs));
        }

        let data_dir = match std::env::var("SNAP_VOCAB_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_data_dir(),
        };

        Ok(Self { gateway, data_dir })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(Error::Configuration(format!(
            "REQUEST_TIMEOUT_SECS must be a positive integer, got '{}'",
            raw
        ))),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
}
