/// Machine Translation Module
///
/// This module produces machine translation proposals for missing locale
/// strings without disturbing `{{...}}` template placeholders.
///
/// # Overview
///
/// 1. **Segmenter** - Cuts text around placeholders so only free text reaches the MT system
/// 2. **MT Trait & Providers** - Generic trait with Google gtx, Google Cloud v2 and mock providers
///
/// # Example
///
/// ```ignore
/// use locale_updater::mt::{GoogleGtxProvider, translate_preserving_placeholders};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = GoogleGtxProvider::new()?;
///     let translated =
///         translate_preserving_placeholders(&provider, "Hi {{user}}!", "en", "fr").await?;
///     println!("{}", translated); // "Salut {{user}}!"
///     Ok(())
/// }
/// ```
pub mod error;
pub mod google_gtx;
pub mod google_translate;
pub mod mock;
pub mod segmenter;
pub mod translator;

pub use error::{MtError, MtResult};
pub use google_gtx::GoogleGtxProvider;
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use segmenter::{PlaceholderSpan, Segmentation, segment, translate_preserving_placeholders};
pub use translator::{MachineTranslator, validate_locale};
