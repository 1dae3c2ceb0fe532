//! Google Cloud Translation API v2 provider
//!
//! # Authentication
//!
//! The provider loads the API key from the `GOOGLE_TRANSLATE_API_KEY`
//! environment variable. Obtain a key from:
//! https://console.cloud.google.com/
//!
//! # Example
//!
//! ```ignore
//! use locale_updater::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("Hello, world!", "en", "pt-BR").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, validate_locale};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Google Translate API v2 provider
///
/// Sends every batch chunk as one request; language codes are passed
/// through unchanged so regional codes such as `pt-BR` and `zh-TW` keep
/// their region.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Google Translate v2 API accepts up to 128 texts per request
    const MAX_BATCH_SIZE: usize = 128;

    /// Maximum characters per string
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Create a new GoogleTranslateProvider with an explicit API key
    ///
    /// # Errors
    ///
    /// `MtError::ConfigError` if the key is blank, `MtError::NetworkError`
    /// if the HTTP client cannot be built.
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a GoogleTranslateProvider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", API_KEY_ENV))
        })?;

        Self::new(api_key)
    }

    /// Point the provider at a different endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chunk_batch(texts: &[String]) -> Vec<&[String]> {
        texts.chunks(Self::MAX_BATCH_SIZE).collect()
    }

    /// Extract `data.translations[].translatedText` from a response body
    fn parse_response(body: &str, expected: usize) -> MtResult<Vec<String>> {
        let response: TranslateResponse = serde_json::from_str(body).map_err(|e| {
            MtError::MalformedResponse(format!("Failed to parse API response: {}", e))
        })?;

        let results: Vec<String> = response
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect();

        if results.len() != expected {
            return Err(MtError::MalformedResponse(format!(
                "Expected {} translations, got {}",
                expected,
                results.len()
            )));
        }
        Ok(results)
    }

    async fn translate_chunk(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        let body = json!({
            "q": texts,
            "source": source_locale,
            "target": target_locale,
            "format": "text"
        });

        let response = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("API client error ({}): {}", status, text))
            } else {
                MtError::TranslationError(format!("API server error ({}): {}", status, text))
            });
        }

        Self::parse_response(&text, texts.len())
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        let results = self
            .translate_batch(&[text.to_string()], source_locale, target_locale)
            .await?;
        Ok(results.into_iter().next().unwrap_or_default())
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        for (i, text) in texts.iter().enumerate() {
            if text.chars().count() > Self::MAX_CHARS_PER_STRING {
                return Err(MtError::TranslationError(format!(
                    "Text at index {} exceeds maximum length of {} characters",
                    i,
                    Self::MAX_CHARS_PER_STRING
                )));
            }
        }

        // Empty strings never reach the API; their slots are refilled below.
        let pending: Vec<(usize, String)> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| (i, text.clone()))
            .collect();
        let mut results = vec![String::new(); texts.len()];
        if pending.is_empty() {
            return Ok(results);
        }

        let pending_texts: Vec<String> = pending.iter().map(|(_, text)| text.clone()).collect();
        let mut translated = Vec::with_capacity(pending_texts.len());
        for chunk in Self::chunk_batch(&pending_texts) {
            tracing::debug!(texts = chunk.len(), "sending Google Translate v2 request");
            translated.extend(
                self.translate_chunk(chunk, source_locale, target_locale)
                    .await?,
            );
        }

        for ((index, _), translation) in pending.into_iter().zip(translated) {
            results[index] = translation;
        }
        Ok(results)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
