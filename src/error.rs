use crate::mt::MtError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort (or, for translation failures, degrade) an update run
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// Reference or target file missing, unreadable, or not a JSON object
    #[error("Failed to load '{}': {reason}", .path.display())]
    InputLoad { path: PathBuf, reason: String },

    /// The translation backend failed
    #[error("Translation backend error: {0}")]
    TranslationBackend(MtError),

    /// Source text has unbalanced or misordered `{{`/`}}` delimiters
    #[error("{0}")]
    MalformedPlaceholder(MtError),

    /// Unflattening found a scalar where `key` needs an object at `prefix`
    #[error("Key '{key}' collides with the value already stored at '{prefix}'")]
    PrefixCollision { key: String, prefix: String },

    /// The locale filename names a language the table does not know
    #[error("Unknown language '{language}' in '{file}'; pass the code explicitly")]
    UnknownLanguage { file: String, language: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Failed to write '{}': {reason}", .path.display())]
    OutputWrite { path: PathBuf, reason: String },

    /// Printing to or reading from the terminal failed
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

impl From<MtError> for UpdaterError {
    fn from(err: MtError) -> Self {
        match err {
            MtError::MalformedPlaceholder(_) => UpdaterError::MalformedPlaceholder(err),
            _ => UpdaterError::TranslationBackend(err),
        }
    }
}

pub type UpdaterResult<T> = Result<T, UpdaterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mt_error_conversion() {
        let backend: UpdaterError = MtError::NetworkError("timeout".to_string()).into();
        assert!(matches!(backend, UpdaterError::TranslationBackend(_)));

        let malformed: UpdaterError = MtError::MalformedPlaceholder("{{".to_string()).into();
        assert!(matches!(malformed, UpdaterError::MalformedPlaceholder(_)));
    }

    #[test]
    fn test_display_includes_path() {
        let err = UpdaterError::InputLoad {
            path: PathBuf::from("locales/fr.json"),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load 'locales/fr.json': No such file or directory"
        );
    }
}
