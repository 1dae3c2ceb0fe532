//! Keyless Google Translate provider (`translate_a/single?client=gtx`)
//!
//! This is the endpoint used by browser extensions and scripts that have no
//! API key. It answers with a positional JSON array rather than an object:
//!
//! ```text
//! [[["Bonjour ","Hello ",null,null,10],["le monde","world",null,null,10]],null,"en",...]
//! ```
//!
//! Element `[0]` holds one entry per sentence; the translation is the
//! concatenation of each entry's first element.

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, validate_locale};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Debug, Clone)]
pub struct GoogleGtxProvider {
    client: reqwest::Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl GoogleGtxProvider {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

    pub fn new() -> MtResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attempts per text, counting the first one. Clamped to at least 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Concatenate the sentence translations found in a gtx response body
    fn parse_response(body: &str) -> MtResult<String> {
        let json: Value = serde_json::from_str(body).map_err(|e| {
            MtError::MalformedResponse(format!("Failed to parse gtx response: {}", e))
        })?;

        let sentences = json
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                MtError::MalformedResponse(
                    "Invalid gtx response: element 0 is not an array".to_string(),
                )
            })?;

        let parts: Vec<&str> = sentences
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
            .collect();
        if parts.is_empty() {
            return Err(MtError::MalformedResponse(
                "Invalid gtx response: no translated sentences".to_string(),
            ));
        }
        Ok(parts.concat())
    }

    async fn request(&self, text: &str, source_locale: &str, target_locale: &str) -> MtResult<String> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_locale),
                ("tl", target_locale),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() == 429 || status.is_server_error() {
            return Err(MtError::TranslationError(format!(
                "gtx server error ({}): {}",
                status, body
            )));
        }
        if !status.is_success() {
            return Err(MtError::ConfigError(format!(
                "gtx client error ({}): {}",
                status, body
            )));
        }

        Self::parse_response(&body)
    }
}

#[async_trait]
impl MachineTranslator for GoogleGtxProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let mut attempt = 1;
        loop {
            match self.request(text, source_locale, target_locale).await {
                Ok(translation) => return Ok(translation),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "gtx request failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Google Translate (gtx)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_sentence() {
        let body = r#"[[["Bonjour","Hello",null,null,10]],null,"en"]"#;
        assert_eq!(GoogleGtxProvider::parse_response(body).unwrap(), "Bonjour");
    }

    #[test]
    fn test_parse_concatenates_sentences() {
        let body = r#"[[["Bonjour. ","Hello. ",null,null,10],["Au revoir.","Goodbye.",null,null,10],[null,null,"Bonjour. Au revoir."]],null,"en"]"#;
        assert_eq!(
            GoogleGtxProvider::parse_response(body).unwrap(),
            "Bonjour. Au revoir."
        );
    }

    #[test]
    fn test_parse_preserves_non_ascii() {
        let body = r#"[[["你好，世界","Hello, world",null,null,10]],null,"en"]"#;
        assert_eq!(GoogleGtxProvider::parse_response(body).unwrap(), "你好，世界");
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(
            GoogleGtxProvider::parse_response("<html>rate limited</html>"),
            Err(MtError::MalformedResponse(_))
        ));
        assert!(matches!(
            GoogleGtxProvider::parse_response(r#"{"error":"nope"}"#),
            Err(MtError::MalformedResponse(_))
        ));
        assert!(matches!(
            GoogleGtxProvider::parse_response("[null]"),
            Err(MtError::MalformedResponse(_))
        ));
        assert!(matches!(
            GoogleGtxProvider::parse_response("[[]]"),
            Err(MtError::MalformedResponse(_))
        ));
        assert!(matches!(
            GoogleGtxProvider::parse_response("[[[null]]]"),
            Err(MtError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_max_attempts_clamped() {
        let provider = GoogleGtxProvider::new().unwrap().with_max_attempts(0);
        assert_eq!(provider.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_empty_text_skips_request() {
        let provider = GoogleGtxProvider::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:9/unused");
        assert_eq!(provider.translate("", "en", "zh-CN").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_invalid_locale() {
        let provider = GoogleGtxProvider::new().unwrap();
        let result = provider.translate("hello", "", "fr").await;
        assert!(matches!(result, Err(MtError::InvalidLocale(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_gives_up() {
        let provider = GoogleGtxProvider::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:9/unused")
            .with_max_attempts(2)
            .with_retry_delay(Duration::from_millis(1));
        let result = provider.translate("hello", "en", "fr").await;
        assert!(result.unwrap_err().is_backend_failure());
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_gtx_translation() {
        let provider = GoogleGtxProvider::new().unwrap();
        let result = provider.translate("Hello", "en", "fr").await.unwrap();
        println!("Translation: Hello → {}", result);
        assert!(!result.is_empty());
    }
}
