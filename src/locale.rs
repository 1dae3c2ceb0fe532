//! Mapping from locale filenames to translation backend language codes

use crate::error::{UpdaterError, UpdaterResult};
use std::collections::HashMap;
use std::path::Path;

/// Lookup table from locale file language codes to backend language codes
///
/// Keys are what appears in locale filenames (`pt`, `zh-Hant`); values are
/// what the translation backend expects (`pt-BR`, `zh-TW`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable(HashMap<String, String>);

impl Default for LanguageTable {
    fn default() -> Self {
        let mut table = LanguageTable::empty();
        for code in [
            "de", "en", "es", "fr", "it", "ko", "nl", "pl", "ru", "sl", "sv", "tr", "uk", "vi",
        ] {
            table.with_entry(code, code);
        }
        table
            .with_entry("pt", "pt-BR")
            .with_entry("zh-Hant", "zh-TW")
            .with_entry("zh-Hans", "zh-CN");
        table
    }
}

impl LanguageTable {
    pub fn empty() -> Self {
        LanguageTable(HashMap::new())
    }

    pub fn with_entry(&mut self, language: &str, code: &str) -> &mut Self {
        self.0.insert(language.to_owned(), code.to_owned());
        self
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Backend language code for a locale file such as `pt_BR.json`
    ///
    /// The file stem is looked up as a whole first (`zh_Hant` and `zh-Hant`
    /// both hit the `zh-Hant` entry). Otherwise it is split on `_` into a
    /// language and an optional region; the region, uppercased, replaces any
    /// region the table entry already carries.
    ///
    /// # Errors
    ///
    /// `UpdaterError::UnknownLanguage` when the language is not in the table.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let table = LanguageTable::default();
    /// assert_eq!(table.code_for_file(Path::new("zh_Hant.json"))?, "zh-TW");
    /// assert_eq!(table.code_for_file(Path::new("pt_BR.json"))?, "pt-BR");
    /// assert_eq!(table.code_for_file(Path::new("en.json"))?, "en");
    /// ```
    pub fn code_for_file(&self, path: &Path) -> UpdaterResult<String> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file.split('.').next().unwrap_or_default();

        if let Some(code) = self.get(&stem.replace('_', "-")) {
            return Ok(code.to_string());
        }

        let (language, region) = match stem.split_once('_') {
            Some((language, region)) => (language, Some(region)),
            None => (stem, None),
        };

        let code = self
            .get(language)
            .ok_or_else(|| UpdaterError::UnknownLanguage {
                file: file.clone(),
                language: language.to_string(),
            })?;

        Ok(match region.filter(|region| !region.is_empty()) {
            Some(region) => {
                let base = code.split('-').next().unwrap_or(code);
                format!("{}-{}", base, region.to_uppercase())
            }
            None => code.to_string(),
        })
    }
}
