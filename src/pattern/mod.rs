//! Per-address matcher synthesis.
//!
//! Every discovered address gets one [`Matcher`] recognizing all of its
//! legal spellings. Case permutations are covered by per-character classes
//! (`[Aa]`), never by enumerating permutations, so pattern size stays
//! linear in the address length.

pub mod ipv4;
pub mod ipv6;
pub mod mac;

pub use ipv4::synthesize_ipv4;
pub use ipv6::synthesize_ipv6;
pub use mac::synthesize_mac;

use std::borrow::Cow;

use fancy_regex::{NoExpand, Regex};

use crate::address::AddressKind;
use crate::error::{NetscrubError, Result};

/// A compiled pattern for one address, plus an anchored twin used for
/// full-match coverage tests.
///
/// Patterns may carry lookaround, so the edges of an address are checked
/// exactly the way the scanners check them.
#[derive(Debug, Clone)]
pub struct Matcher {
    source: String,
    regex: Regex,
    full: Regex,
}

impl Matcher {
    /// Compile a matcher from pattern source.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| NetscrubError::Pattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        };
        let regex = compile(&source)?;
        let full = compile(&format!("^(?:{source})$"))?;
        Ok(Self {
            source,
            regex,
            full,
        })
    }

    /// The pattern source, sufficient to rebuild this matcher.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the whole of `candidate` is a spelling of this address.
    pub fn is_full_match(&self, candidate: &str) -> bool {
        self.full.is_match(candidate).unwrap_or_else(|e| {
            tracing::warn!("full match of {candidate:?} aborted: {e}");
            false
        })
    }

    /// True when any spelling of this address occurs in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text).unwrap_or_else(|e| {
            tracing::warn!("match aborted: {e}");
            false
        })
    }

    /// Replace every occurrence in `text` with `replacement`, taken literally.
    pub fn replace_all<'t>(&self, text: &'t str, replacement: &str) -> Result<Cow<'t, str>> {
        self.regex
            .try_replacen(text, 0, NoExpand(replacement))
            .map_err(|e| NetscrubError::Pattern {
                pattern: self.source.clone(),
                reason: e.to_string(),
            })
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Matcher {}

/// Build the matcher for a canonical address of the given kind.
pub fn synthesize(kind: AddressKind, canonical: &str) -> Result<Matcher> {
    match kind {
        AddressKind::Mac => synthesize_mac(canonical),
        AddressKind::Ipv4 => synthesize_ipv4(canonical),
        AddressKind::Ipv6 => synthesize_ipv6(canonical),
    }
}

/// Case-insensitive pattern for a fixed token: letters become `[Xx]`
/// classes, everything else is matched literally.
///
/// ```
/// assert_eq!(netscrub::pattern::case_expand("Ab1"), "[Aa][Bb]1");
/// ```
pub fn case_expand(token: &str) -> String {
    let mut out = String::with_capacity(token.len() * 4);
    for c in token.chars() {
        if c.is_alphabetic() {
            out.push('[');
            out.extend(c.to_uppercase());
            out.extend(c.to_lowercase());
            out.push(']');
        } else {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4])));
        }
    }
    out
}

/// Like [`case_expand`], but the token's leading zeros become optional:
/// `0045` matches `45`, `045` and `0045`.
///
/// ```
/// use netscrub::pattern::elide_leading_zeros;
/// assert_eq!(elide_leading_zeros("0045"), "0{0,2}45");
/// assert_eq!(elide_leading_zeros("45"), "45");
/// assert_eq!(elide_leading_zeros("000"), "0{1,3}");
/// assert_eq!(elide_leading_zeros("0"), "0");
/// ```
pub fn elide_leading_zeros(token: &str) -> String {
    if token == "0" {
        return token.to_string();
    }
    let zeros = token.bytes().take_while(|b| *b == b'0').count();
    if zeros == 0 {
        case_expand(token)
    } else if zeros == token.len() {
        format!("0{{1,{zeros}}}")
    } else {
        format!("0{{0,{zeros}}}{}", case_expand(&token[zeros..]))
    }
}
