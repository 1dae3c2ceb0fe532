use crate::flatten::DEFAULT_SEPARATOR;
use crate::mt::{
    GoogleGtxProvider, GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator,
    MtResult,
};
use crate::updater::UpdateOptions;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Translation backend selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Keyless Google Translate endpoint
    Gtx,
    /// Google Cloud Translation v2, key from GOOGLE_TRANSLATE_API_KEY
    Google,
    /// Offline stub that appends the target code, for dry runs
    Mock,
}

/// Patch missing translations in a locale file.
///
/// Keys present in the reference locale but missing from the target locale
/// are listed, then proposed one by one with a machine translation. Press
/// enter to accept a proposal or type a better one. The result is written to
/// `<target>.proposed.json` for review.
#[derive(Debug, Parser)]
#[command(name = "locale-updater", version)]
pub struct Cli {
    /// Reference locale file, e.g. en.json
    pub ref_locale: PathBuf,

    /// Target locale file to complete, e.g. zh-Hans.json
    pub tgt_locale: PathBuf,

    /// Translation backend
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Gtx)]
    pub provider: ProviderKind,

    /// Backend code of the reference language (default: derived from the filename)
    #[arg(long)]
    pub source_lang: Option<String>,

    /// Backend code of the target language (default: derived from the filename)
    #[arg(long)]
    pub target_lang: Option<String>,

    /// Separator used to join nested keys
    #[arg(long, default_value = DEFAULT_SEPARATOR)]
    pub separator: String,

    /// Directory for the proposal file
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Accept every machine proposal without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Keep document order instead of sorting keys in the output
    #[arg(long)]
    pub keep_order: bool,

    /// Attempts per request for the gtx backend
    #[arg(long, default_value_t = GoogleGtxProvider::DEFAULT_MAX_ATTEMPTS)]
    pub attempts: u32,

    /// Show debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> UpdateOptions {
        let mut options = UpdateOptions::new(&self.ref_locale, &self.tgt_locale);
        options.output_dir = self.output_dir.clone();
        options.separator = self.separator.clone();
        options.source_locale = self.source_lang.clone();
        options.target_locale = self.target_lang.clone();
        options.accept_all = self.yes;
        options.sort_output = !self.keep_order;
        options
    }

    pub fn translator(&self) -> MtResult<Box<dyn MachineTranslator>> {
        Ok(match self.provider {
            ProviderKind::Gtx => {
                Box::new(GoogleGtxProvider::new()?.with_max_attempts(self.attempts))
            }
            ProviderKind::Google => Box::new(GoogleTranslateProvider::from_env()?),
            ProviderKind::Mock => Box::new(MockTranslator::new(MockMode::Suffix)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["locale-updater", "en.json", "fr.json"]).unwrap();
        assert_eq!(cli.provider, ProviderKind::Gtx);
        assert_eq!(cli.attempts, 3);

        let options = cli.options();
        assert_eq!(options.reference, PathBuf::from("en.json"));
        assert_eq!(options.target, PathBuf::from("fr.json"));
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert_eq!(options.separator, ":");
        assert!(options.sort_output);
        assert!(!options.accept_all);
        assert_eq!(options.source_locale, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "locale-updater",
            "en.json",
            "ja.json",
            "--provider",
            "mock",
            "--target-lang",
            "ja",
            "--separator",
            ".",
            "-o",
            "out",
            "-y",
            "--keep-order",
        ])
        .unwrap();

        assert_eq!(cli.provider, ProviderKind::Mock);
        let options = cli.options();
        assert_eq!(options.target_locale.as_deref(), Some("ja"));
        assert_eq!(options.separator, ".");
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert!(options.accept_all);
        assert!(!options.sort_output);
        assert_eq!(cli.translator().unwrap().provider_name(), "Mock Translator");
    }

    #[test]
    fn test_positional_arguments_required() {
        assert!(Cli::try_parse_from(["locale-updater", "en.json"]).is_err());
    }
}
