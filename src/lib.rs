//! Patch missing translations in locale files.
//!
//! The reference and target locale documents are flattened into composite
//! keys, diffed, and every key missing from the target is proposed through a
//! [`mt::MachineTranslator`] for a human to accept or correct. Template
//! placeholders such as `{{name}}` never reach the translation backend.

pub mod cli;
pub mod diff;
pub mod error;
pub mod flatten;
pub mod loader;
pub mod locale;
pub mod mt;
pub mod resolver;
pub mod updater;


pub use diff::missing_keys;
pub use error::{UpdaterError, UpdaterResult};
pub use flatten::{DEFAULT_SEPARATOR, FlatMessages, flatten, sort_document, unflatten};
pub use loader::{load_document, proposed_path, save_document};
pub use locale::LanguageTable;
pub use resolver::{Resolution, ResolutionSource, ResolutionSummary, Resolver};
pub use updater::{UpdateOptions, UpdateOutcome, run};
