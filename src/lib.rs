//! Reversible redaction of MAC, IPv4 and IPv6 addresses in text.
//!
//! Addresses are discovered across a corpus, each distinct address gets a
//! `[REDACTED:<KIND>:<N>]` placeholder, and a matcher that recognizes every
//! common spelling of it. The resulting [`RedactionMap`] is saved next to the
//! redacted output and can be extended by later runs or used to restore.

pub mod address;
pub mod cli;
pub mod config;
pub mod error;
pub mod pattern;
pub mod redact;
pub mod scan;

pub use address::AddressKind;
pub use error::{NetscrubError, Result};
pub use redact::{Executor, LegacyMap, RedactionEntry, RedactionMap, Redactor};
pub use scan::AddressSet;
