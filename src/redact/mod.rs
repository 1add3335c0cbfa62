pub mod executor;
pub mod legacy;
pub mod map;

pub use executor::{apply, apply_many, redact_text, Executor};
pub use legacy::LegacyMap;
pub use map::{RedactionEntry, RedactionMap};

/// Anything that can rewrite a document with its addresses redacted.
///
/// Implemented by the matcher-based [`RedactionMap`] and by the exact-string
/// [`LegacyMap`]. A redactor is read-only once built, so one instance can be
/// shared across worker threads.
pub trait Redactor: Send + Sync {
    /// Return `input` with every known address replaced.
    fn redact(&self, input: &str) -> String;

    /// Name of this redactor (for logging).
    fn name(&self) -> &str;
}
