//! Processor configuration.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

use crate::classifier::SupportedTypes;
use crate::error::{ExtractError, ExtractResult};

/// Default base URL of the Telegram Bot API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// How the text extractor handles invalid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoding {
    /// Replace invalid sequences with U+FFFD.
    #[default]
    Lossy,
    /// Reject invalid sequences with `TextProcessingFailed`.
    Strict,
}

impl std::str::FromStr for TextDecoding {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lossy" => Ok(Self::Lossy),
            "strict" => Ok(Self::Strict),
            other => Err(ExtractError::Configuration(format!(
                "Unknown text decoding '{}'. Use 'lossy' or 'strict'",
                other
            ))),
        }
    }
}

/// Immutable configuration handed to the processor at construction.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Bot credential embedded in download URLs.
    pub bot_token: SecretString,
    /// Base URL of the file-hosting endpoint.
    pub api_base_url: String,
    /// Extension table used for routing.
    pub supported_types: SupportedTypes,
    /// Invalid UTF-8 policy for text files.
    pub text_decoding: TextDecoding,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            bot_token: SecretString::new(String::new()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            supported_types: SupportedTypes::default(),
            text_decoding: TextDecoding::default(),
        }
    }
}

impl ProcessorConfig {
    /// Create a config with the given bot token and defaults elsewhere.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::new(bot_token.into()),
            ..Default::default()
        }
    }

    /// Override the file-hosting base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the supported-types table.
    pub fn with_supported_types(mut self, table: SupportedTypes) -> Self {
        self.supported_types = table.normalized();
        self
    }

    /// Set the invalid UTF-8 policy.
    pub fn with_text_decoding(mut self, decoding: TextDecoding) -> Self {
        self.text_decoding = decoding;
        self
    }

    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `TELEGRAM_BOT_TOKEN` or `BOT_TOKEN` (default: empty)
    /// - `DOCPROC_API_BASE_URL` (default: https://api.telegram.org)
    /// - `DOCPROC_TEXT_DECODING` (`lossy` or `strict`, default: lossy)
    ///
    /// A missing token is not an error here; it surfaces as a failed download.
    pub fn from_env() -> ExtractResult<Self> {
        let mut config = Self::default();

        if let Some(token) = env_token() {
            config.bot_token = SecretString::new(token);
        }

        if let Ok(url) = std::env::var("DOCPROC_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Ok(decoding) = std::env::var("DOCPROC_TEXT_DECODING") {
            config.text_decoding = decoding.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    ///
    /// The environment token is used when the file does not set one.
    pub fn from_file(path: impl AsRef<Path>) -> ExtractResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let ext = path.extension().and_then(|e| e.to_str());

        let mut config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ExtractError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ExtractError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| ExtractError::Configuration(e.to_string()))?,
            _ => {
                return Err(ExtractError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        if config.bot_token.expose_secret().is_empty() {
            if let Some(token) = env_token() {
                config.bot_token = SecretString::new(token);
            }
        }

        config.supported_types = config.supported_types.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Check the base URL and that no extension belongs to two categories.
    pub fn validate(&self) -> ExtractResult<()> {
        url::Url::parse(&self.api_base_url).map_err(|e| {
            ExtractError::Configuration(format!("Invalid API base URL '{}': {}", self.api_base_url, e))
        })?;

        if let Some(ext) = self.supported_types.find_overlap() {
            return Err(ExtractError::Configuration(format!(
                "Extension '{}' is listed under more than one category",
                ext
            )));
        }

        Ok(())
    }
}

fn env_token() -> Option<String> {
    std::env::var("TELEGRAM_BOT_TOKEN")
        .or_else(|_| std::env::var("BOT_TOKEN"))
        .ok()
}
