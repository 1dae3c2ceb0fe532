use thiserror::Error;

/// Error types for the Machine Translation module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// Source text has unbalanced, misordered or nested `{{`/`}}` delimiters
    #[error("Malformed placeholder: {0}")]
    MalformedPlaceholder(String),
    /// Language code rejected before any request was made
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Provider misconfiguration, or the backend rejected the request (4xx)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport failure: connection, timeout, TLS
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The backend failed to translate (5xx or an explicit refusal)
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// The backend answered with a body we cannot read a translation from
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl MtError {
    /// True when the error came from talking to the translation backend,
    /// as opposed to problems with the input text itself.
    pub fn is_backend_failure(&self) -> bool {
        !matches!(
            self,
            MtError::MalformedPlaceholder(_) | MtError::InvalidLocale(_)
        )
    }

    /// True when repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, MtError::NetworkError(_) | MtError::TranslationError(_))
    }
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MtError::MalformedResponse(err.to_string())
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
