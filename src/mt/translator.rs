//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! enabling support for different MT backends (Google gtx, Google Cloud v2,
//! mock) without coupling the updater to any specific implementation.
//!
//! # Example
//!
//! ```ignore
//! use locale_updater::mt::{GoogleGtxProvider, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleGtxProvider::new()?;
//!
//!     let result = provider.translate("Hello, world!", "en", "fr").await?;
//!     println!("{}", result); // "Bonjour le monde!"
//!
//!     let texts = vec!["Hello".to_string(), "Goodbye".to_string()];
//!     let results = provider.translate_batch(&texts, "en", "fr").await?;
//!     println!("{:?}", results);
//!
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;
use futures::future::try_join_all;

/// Generic trait for machine translation providers
///
/// Implementations of this trait handle the actual translation work,
/// whether through an API (Google Translate) or deterministic logic (Mock).
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target language
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate. May be empty; implementations must
    ///   return an empty string rather than an error in that case.
    /// * `source_locale` - Backend language code (e.g., "en", "pt-BR")
    /// * `target_locale` - Backend language code (e.g., "zh-TW")
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Translate multiple independent strings
    ///
    /// The default implementation issues one `translate` call per text and
    /// runs them concurrently. Providers with a native batch endpoint
    /// should override it.
    ///
    /// # Guarantees
    ///
    /// - Output order matches input order
    /// - Output length equals input length
    /// - Each translation is independent
    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        try_join_all(
            texts
                .iter()
                .map(|text| self.translate(text, source_locale, target_locale)),
        )
        .await
    }

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code is non-empty and contains only alphanumeric
/// characters, hyphens, and underscores.
///
/// # Example
///
/// ```ignore
/// validate_locale("en")?; // OK
/// validate_locale("zh-TW")?; // OK
/// validate_locale("invalid@code").unwrap_err(); // Error
/// ```
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MachineTranslator for CountingTranslator {
        async fn translate(&self, text: &str, _source: &str, target: &str) -> MtResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}]{}", target, text))
        }

        fn provider_name(&self) -> &str {
            "Counting"
        }
    }

    #[tokio::test]
    async fn test_default_batch_preserves_order() {
        let translator = CountingTranslator {
            calls: AtomicUsize::new(0),
        };
        let texts = vec!["one".to_string(), "".to_string(), "three".to_string()];
        let results = translator.translate_batch(&texts, "en", "fr").await.unwrap();

        assert_eq!(results, vec!["[fr]one", "[fr]", "[fr]three"]);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_default_batch_empty() {
        let translator = CountingTranslator {
            calls: AtomicUsize::new(0),
        };
        let results = translator.translate_batch(&[], "en", "fr").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_validate_locale_valid_codes() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("pt-BR").is_ok());
        assert!(validate_locale("zh-TW").is_ok());
        assert!(validate_locale("de_DE").is_ok());
    }

    #[test]
    fn test_validate_locale_invalid_codes() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("en@invalid").is_err());
        assert!(validate_locale("fr#bad").is_err());
        assert!(validate_locale("es!error").is_err());
    }

    #[test]
    fn test_validate_locale_error_messages() {
        match validate_locale("en@US") {
            Err(MtError::InvalidLocale(msg)) => {
                assert!(msg.contains("Invalid characters"));
            }
            _ => panic!("Expected InvalidLocale error"),
        }
    }
}
