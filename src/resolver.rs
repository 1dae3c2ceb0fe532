//! Human-in-the-loop resolution of missing keys
//!
//! For each missing key the resolver shows the reference text, asks the
//! translation provider for a proposal, and lets the translator type a
//! correction. An empty answer accepts the proposal. Keys are handled one at
//! a time; the human is the bottleneck, so nothing here runs concurrently.

use crate::error::{UpdaterError, UpdaterResult};
use crate::flatten::FlatMessages;
use crate::mt::{MachineTranslator, translate_preserving_placeholders};
use console::style;
use serde_json::Value;
use std::io::{BufRead, Write};

const RULE: &str = "=============================================";

/// Where the value stored for a missing key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Typed by the translator
    Typed,
    /// The machine proposal, accepted with an empty answer or `--yes`
    Proposal,
    /// No proposal was available and nothing was typed: the reference text
    ReferenceFallback,
    /// A non-text reference value (number, list, ...) copied as-is
    Copied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub key: String,
    pub value: Value,
    pub source: ResolutionSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionSummary {
    pub resolutions: Vec<Resolution>,
}

impl ResolutionSummary {
    pub fn count(&self, source: ResolutionSource) -> usize {
        self.resolutions
            .iter()
            .filter(|resolution| resolution.source == source)
            .count()
    }

    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }
}

/// Interactive resolver reading answers from `input` and writing to `output`
pub struct Resolver<'a, R, W> {
    translator: &'a dyn MachineTranslator,
    source_locale: String,
    target_locale: String,
    input: R,
    output: W,
    accept_all: bool,
}

impl<'a, R: BufRead, W: Write> Resolver<'a, R, W> {
    pub fn new(
        translator: &'a dyn MachineTranslator,
        source_locale: &str,
        target_locale: &str,
        input: R,
        output: W,
    ) -> Self {
        Self {
            translator,
            source_locale: source_locale.to_owned(),
            target_locale: target_locale.to_owned(),
            input,
            output,
            accept_all: false,
        }
    }

    /// Accept every proposal without prompting
    pub fn accept_all(mut self, accept_all: bool) -> Self {
        self.accept_all = accept_all;
        self
    }

    /// Print the missing keys with their reference values, bracketed by totals
    pub fn report_missing(&mut self, reference: &FlatMessages, missing: &[String]) -> UpdaterResult<()> {
        writeln!(
            self.output,
            "{} {}",
            style("Total missing keys:").red(),
            missing.len()
        )?;
        for key in missing {
            writeln!(
                self.output,
                "{} | {}",
                style(format!("Missing key: {}", key)).red(),
                style(format!(
                    "{}: {}",
                    self.source_locale,
                    display_value(reference.get(key))
                ))
                .green()
            )?;
        }
        writeln!(self.output, "{}", RULE)?;
        writeln!(
            self.output,
            "{} {}",
            style("Total missing keys:").red(),
            missing.len()
        )?;
        Ok(())
    }

    /// Resolve every key in `missing`, storing the chosen value in `target`
    ///
    /// Every key ends up with a value: translation failures degrade to a
    /// prompt without proposal, and an empty answer then keeps the reference
    /// text.
    pub async fn resolve(
        &mut self,
        reference: &FlatMessages,
        target: &mut FlatMessages,
        missing: &[String],
    ) -> UpdaterResult<ResolutionSummary> {
        if let Some(key) = missing.iter().find(|key| !reference.contains_key(key)) {
            return Err(UpdaterError::InvalidOption(format!(
                "missing key '{}' has no reference value",
                key
            )));
        }

        let mut summary = ResolutionSummary::default();

        for (index, key) in missing.iter().enumerate() {
            writeln!(self.output, "{} {}/{}", RULE, index + 1, missing.len())?;
            writeln!(self.output, "{}{}", style("Missing key: ").red(), key)?;

            let Some(reference_value) = reference.get(key) else {
                continue;
            };

            let resolution = match reference_value.as_str() {
                Some(text) => self.resolve_text(key, text).await?,
                None => {
                    writeln!(
                        self.output,
                        "{}{} {}",
                        style(format!("{}: ", self.source_locale)).green(),
                        reference_value,
                        style("(not text, copied)").dim()
                    )?;
                    Resolution {
                        key: key.clone(),
                        value: reference_value.clone(),
                        source: ResolutionSource::Copied,
                    }
                }
            };

            target.with_message(key, resolution.value.clone());
            summary.resolutions.push(resolution);
        }

        Ok(summary)
    }

    async fn resolve_text(&mut self, key: &str, text: &str) -> UpdaterResult<Resolution> {
        writeln!(
            self.output,
            "{}{}",
            style(format!("{}: ", self.source_locale)).green(),
            text
        )?;

        let proposal = self.propose(key, text).await;
        match &proposal {
            Some(proposal) => writeln!(
                self.output,
                "{}{}",
                style(format!("Reference {} translation: ", self.target_locale)).blue(),
                proposal
            )?,
            None => writeln!(
                self.output,
                "{}",
                style("No machine translation available; empty input keeps the reference text")
                    .yellow()
            )?,
        }

        let answer = if self.accept_all {
            String::new()
        } else {
            self.prompt()?
        };

        let (value, source) = match (answer.is_empty(), proposal) {
            (false, _) => (answer, ResolutionSource::Typed),
            (true, Some(proposal)) => (proposal, ResolutionSource::Proposal),
            (true, None) => (text.to_string(), ResolutionSource::ReferenceFallback),
        };

        Ok(Resolution {
            key: key.to_string(),
            value: Value::String(value),
            source,
        })
    }

    /// Machine proposal for `text`, or `None` after logging why there is none
    async fn propose(&self, key: &str, text: &str) -> Option<String> {
        let result = translate_preserving_placeholders(
            self.translator,
            text,
            &self.source_locale,
            &self.target_locale,
        )
        .await;

        match result {
            Ok(proposal) => Some(proposal),
            Err(err) => {
                let err = UpdaterError::from(err);
                tracing::warn!(key = %key, error = %err, "no machine proposal");
                None
            }
        }
    }

    /// Read one answer line. End of input counts as an empty answer.
    fn prompt(&mut self) -> UpdaterResult<String> {
        write!(self.output, "{}", style("Enter translation: ").green())?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
