//! Placeholder-safe segmentation for machine translation
//!
//! Locale strings carry template references such as `{{name}}` that must
//! reach the translated text byte for byte. Instead of trusting the MT
//! system to leave them alone, the source is cut around every placeholder
//! and only the text between placeholders is sent for translation:
//!
//! ```text
//! "Hi {{user}}, you have {{n}} items"
//!  ^^^        ^^^^^^^^^^^     ^^^^^^   segments (translated)
//!     ^^^^^^^^           ^^^^^         placeholders (copied verbatim)
//! ```
//!
//! Placeholders are paired by position: the n-th `{{` closes at the n-th
//! `}}`. Nested or unbalanced delimiters are rejected with
//! [`MtError::MalformedPlaceholder`].

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::MachineTranslator;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Byte range `[open, close)` of one `{{...}}` placeholder, delimiters included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSpan {
    pub open: usize,
    pub close: usize,
}

/// A source string cut into translatable segments and protected placeholders
///
/// There is always exactly one more segment than there are placeholders;
/// segment `i` precedes placeholder `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation<'a> {
    source: &'a str,
    segments: Vec<&'a str>,
    placeholders: Vec<PlaceholderSpan>,
}

impl<'a> Segmentation<'a> {
    /// Text between placeholders, in source order. Possibly empty strings.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    pub fn placeholders(&self) -> &[PlaceholderSpan] {
        &self.placeholders
    }

    /// Verbatim text of the `index`-th placeholder, delimiters included
    pub fn placeholder_text(&self, index: usize) -> Option<&'a str> {
        self.placeholders
            .get(index)
            .map(|span| &self.source[span.open..span.close])
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// Interleave `translated` segments with the original placeholders
    ///
    /// # Errors
    ///
    /// Returns `MtError::TranslationError` if the number of translated
    /// segments differs from the number of source segments.
    pub fn reassemble<S: AsRef<str>>(&self, translated: &[S]) -> MtResult<String> {
        if translated.len() != self.segments.len() {
            return Err(MtError::TranslationError(format!(
                "Expected {} translated segments, got {}",
                self.segments.len(),
                translated.len()
            )));
        }

        let mut result = String::with_capacity(self.source.len());
        for (index, segment) in translated.iter().enumerate() {
            result.push_str(segment.as_ref());
            if let Some(placeholder) = self.placeholder_text(index) {
                result.push_str(placeholder);
            }
        }
        Ok(result)
    }
}

/// Split `source` around its `{{...}}` placeholders
///
/// # Errors
///
/// Returns `MtError::MalformedPlaceholder` when the number of `{{` and `}}`
/// differs, when a `}}` comes before its paired `{{`, or when placeholders
/// nest or overlap.
///
/// # Example
///
/// ```ignore
/// let seg = segment("Hi {{user}}, you have {{n}} items")?;
/// assert_eq!(seg.segments(), &["Hi ", ", you have ", " items"]);
/// assert_eq!(seg.placeholder_text(0), Some("{{user}}"));
/// ```
pub fn segment(source: &str) -> MtResult<Segmentation<'_>> {
    let opens: Vec<usize> = source.match_indices(OPEN).map(|(i, _)| i).collect();
    let closes: Vec<usize> = source.match_indices(CLOSE).map(|(i, _)| i).collect();

    if opens.len() != closes.len() {
        return Err(MtError::MalformedPlaceholder(format!(
            "{} opening and {} closing delimiters in {:?}",
            opens.len(),
            closes.len(),
            source
        )));
    }

    let mut placeholders = Vec::with_capacity(opens.len());
    let mut previous_end = 0;
    for (&open, &close) in opens.iter().zip(&closes) {
        if close < open + OPEN.len() {
            return Err(MtError::MalformedPlaceholder(format!(
                "closing delimiter at byte {} precedes its opening delimiter at byte {} in {:?}",
                close, open, source
            )));
        }
        if open < previous_end {
            return Err(MtError::MalformedPlaceholder(format!(
                "nested placeholder at byte {} in {:?}",
                open, source
            )));
        }
        let span = PlaceholderSpan {
            open,
            close: close + CLOSE.len(),
        };
        previous_end = span.close;
        placeholders.push(span);
    }

    let mut segments = Vec::with_capacity(placeholders.len() + 1);
    let mut cursor = 0;
    for span in &placeholders {
        segments.push(&source[cursor..span.open]);
        cursor = span.close;
    }
    segments.push(&source[cursor..]);

    Ok(Segmentation {
        source,
        segments,
        placeholders,
    })
}

/// Translate `text` while keeping every `{{...}}` placeholder verbatim
///
/// Each segment, empty ones included, is translated in isolation through
/// `translator.translate_batch`; the results are stitched back around the
/// untouched placeholders.
pub async fn translate_preserving_placeholders(
    translator: &dyn MachineTranslator,
    text: &str,
    source_locale: &str,
    target_locale: &str,
) -> MtResult<String> {
    let segmentation = segment(text)?;
    let segments: Vec<String> = segmentation
        .segments()
        .iter()
        .map(|s| s.to_string())
        .collect();

    tracing::debug!(
        provider = translator.provider_name(),
        segments = segments.len(),
        placeholders = segmentation.placeholders().len(),
        "translating segmented text"
    );

    let translated = translator
        .translate_batch(&segments, source_locale, target_locale)
        .await?;
    segmentation.reassemble(&translated)
}
