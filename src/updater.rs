//! One update run: load, diff, resolve, write

use crate::diff::missing_keys;
use crate::error::{UpdaterError, UpdaterResult};
use crate::flatten::{DEFAULT_SEPARATOR, FlatMessages, flatten, sort_document, unflatten};
use crate::loader::{load_document, proposed_path, save_document};
use crate::locale::LanguageTable;
use crate::mt::MachineTranslator;
use crate::resolver::{ResolutionSource, ResolutionSummary, Resolver};
use console::style;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Source-of-truth locale file
    pub reference: PathBuf,
    /// Locale file to complete
    pub target: PathBuf,
    /// Directory receiving `<target>.proposed.json`
    pub output_dir: PathBuf,
    pub separator: String,
    /// Backend code for the reference language; derived from the filename when unset
    pub source_locale: Option<String>,
    /// Backend code for the target language; derived from the filename when unset
    pub target_locale: Option<String>,
    /// Take every machine proposal without prompting
    pub accept_all: bool,
    /// Sort keys recursively in the written document
    pub sort_output: bool,
}

impl UpdateOptions {
    pub fn new(reference: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            target: target.into(),
            output_dir: PathBuf::from("."),
            separator: DEFAULT_SEPARATOR.to_string(),
            source_locale: None,
            target_locale: None,
            accept_all: false,
            sort_output: true,
        }
    }

    fn locale_code(
        &self,
        explicit: &Option<String>,
        file: &Path,
        languages: &LanguageTable,
    ) -> UpdaterResult<String> {
        match explicit {
            Some(code) => Ok(code.clone()),
            None => languages.code_for_file(file),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The target already has every reference key; nothing was written
    UpToDate,
    Written {
        path: PathBuf,
        summary: ResolutionSummary,
    },
}

/// Complete the target locale and write the proposal file
///
/// Answers are read from `input` and all user-facing text goes to `output`,
/// so the same run can be driven by a terminal or by a test.
pub async fn run<R: BufRead, W: Write>(
    options: &UpdateOptions,
    languages: &LanguageTable,
    translator: &dyn MachineTranslator,
    input: R,
    mut output: W,
) -> UpdaterResult<UpdateOutcome> {
    if options.separator.is_empty() {
        return Err(UpdaterError::InvalidOption(
            "key separator cannot be empty".to_string(),
        ));
    }

    let source_locale =
        options.locale_code(&options.source_locale, &options.reference, languages)?;
    let target_locale = options.locale_code(&options.target_locale, &options.target, languages)?;
    tracing::info!(
        source = %source_locale,
        target = %target_locale,
        provider = translator.provider_name(),
        "starting locale update"
    );

    let reference = flatten(&load_document(&options.reference)?, &options.separator);
    let mut target = flatten(&load_document(&options.target)?, &options.separator);

    let missing = missing_keys(&reference, &target);
    if missing.is_empty() {
        writeln!(
            output,
            "{}",
            style("All keys are present in the target locale").green()
        )?;
        return Ok(UpdateOutcome::UpToDate);
    }

    check_collisions(&reference, &target, &missing, &options.separator)?;

    let summary = {
        let mut resolver = Resolver::new(
            translator,
            &source_locale,
            &target_locale,
            input,
            &mut output,
        )
        .accept_all(options.accept_all);
        resolver.report_missing(&reference, &missing)?;
        resolver.resolve(&reference, &mut target, &missing).await?
    };

    let mut document = Value::Object(unflatten(&target, &options.separator)?);
    if options.sort_output {
        document = sort_document(&document);
    }

    let path = proposed_path(&options.target, &options.output_dir);
    save_document(&path, &document)?;

    let fallbacks = summary.count(ResolutionSource::ReferenceFallback);
    if fallbacks > 0 {
        writeln!(
            output,
            "{} {} key(s) kept the reference text",
            style("Warning:").yellow(),
            fallbacks
        )?;
    }
    writeln!(
        output,
        "{} {} ({} key(s) filled)",
        style("Proposed translations written to").green(),
        path.display(),
        summary.len()
    )?;

    Ok(UpdateOutcome::Written { path, summary })
}

/// Fail before any prompt if filling `missing` would break the target's shape
fn check_collisions(
    reference: &FlatMessages,
    target: &FlatMessages,
    missing: &[String],
    separator: &str,
) -> UpdaterResult<()> {
    let mut merged = target.clone();
    for key in missing {
        if let Some(value) = reference.get(key) {
            merged.with_message(key, value.clone());
        }
    }
    unflatten(&merged, separator).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::{MockMode, MockTranslator};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn options(dir: &TempDir, reference: &str, target: &str) -> UpdateOptions {
        let mut options = UpdateOptions::new(dir.path().join(reference), dir.path().join(target));
        options.output_dir = dir.path().to_path_buf();
        options
    }

    #[tokio::test]
    async fn test_up_to_date_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"a": "Hello"}"#).unwrap();
        fs::write(dir.path().join("fr.json"), r#"{"a": "Bonjour", "b": "extra"}"#).unwrap();

        let mock = MockTranslator::new(MockMode::Suffix);
        let mut output = Vec::new();
        let outcome = run(
            &options(&dir, "en.json", "fr.json"),
            &LanguageTable::default(),
            &mock,
            Cursor::new(""),
            &mut output,
        )
        .await
        .unwrap();

        assert_eq!(outcome, UpdateOutcome::UpToDate);
        assert!(!dir.path().join("fr.proposed.json").exists());
        assert!(String::from_utf8(output).unwrap().contains("All keys are present"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_language_fails_before_loading() {
        let dir = TempDir::new().unwrap();
        let result = run(
            &options(&dir, "en.json", "xx.json"),
            &LanguageTable::default(),
            &MockTranslator::new(MockMode::Suffix),
            Cursor::new(""),
            Vec::new(),
        )
        .await;
        assert!(matches!(result, Err(UpdaterError::UnknownLanguage { .. })));
    }

    #[tokio::test]
    async fn test_explicit_codes_bypass_table() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.json"), r#"{"a": "Hello"}"#).unwrap();
        fs::write(dir.path().join("ja.json"), r#"{}"#).unwrap();

        let mut options = options(&dir, "base.json", "ja.json");
        options.source_locale = Some("en".to_string());
        options.target_locale = Some("ja".to_string());
        options.accept_all = true;

        let mock = MockTranslator::new(MockMode::Suffix);
        let outcome = run(
            &options,
            &LanguageTable::default(),
            &mock,
            Cursor::new(""),
            Vec::new(),
        )
        .await
        .unwrap();

        let UpdateOutcome::Written { path, .. } = outcome else {
            panic!("Expected a written proposal");
        };
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "{\n  \"a\": \"Hello_ja\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_missing_target_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"a": "Hello"}"#).unwrap();
        let result = run(
            &options(&dir, "en.json", "de.json"),
            &LanguageTable::default(),
            &MockTranslator::new(MockMode::Suffix),
            Cursor::new(""),
            Vec::new(),
        )
        .await;
        assert!(matches!(result, Err(UpdaterError::InputLoad { .. })));
    }

    #[tokio::test]
    async fn test_prefix_collision_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"a": {"b": "Child"}}"#).unwrap();
        fs::write(dir.path().join("de.json"), r#"{"a": "Scalar"}"#).unwrap();

        let mut options = options(&dir, "en.json", "de.json");
        options.accept_all = true;
        let result = run(
            &options,
            &LanguageTable::default(),
            &MockTranslator::new(MockMode::Suffix),
            Cursor::new(""),
            Vec::new(),
        )
        .await;

        assert!(matches!(result, Err(UpdaterError::PrefixCollision { .. })));
        assert!(!dir.path().join("de.proposed.json").exists());
    }

    #[tokio::test]
    async fn test_prefix_collision_fails_before_prompting() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("en.json"),
            r#"{"x": "One", "y": "Two", "menu": "Menu"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("de.json"), r#"{"menu": {"open": "Öffnen"}}"#).unwrap();

        let mock = MockTranslator::new(MockMode::Suffix);
        let mut input = Cursor::new("Eins\nZwei\nMenue\n");
        let mut output = Vec::new();
        let result = run(
            &options(&dir, "en.json", "de.json"),
            &LanguageTable::default(),
            &mock,
            &mut input,
            &mut output,
        )
        .await;

        assert!(matches!(
            result,
            Err(UpdaterError::PrefixCollision { ref key, .. }) if key == "menu"
        ));
        assert!(mock.calls().is_empty());
        assert_eq!(input.position(), 0);
        assert!(output.is_empty());
        assert!(!dir.path().join("de.proposed.json").exists());
    }

    #[tokio::test]
    async fn test_empty_separator_rejected() {
        let dir = TempDir::new().unwrap();
        let mut options = options(&dir, "en.json", "de.json");
        options.separator = String::new();
        let result = run(
            &options,
            &LanguageTable::default(),
            &MockTranslator::new(MockMode::Suffix),
            Cursor::new(""),
            Vec::new(),
        )
        .await;
        assert!(matches!(result, Err(UpdaterError::InvalidOption(_))));
    }
}
