use crate::address::mac_digits;
use crate::error::Result;

use super::{case_expand, Matcher};

/// Matcher for a MAC in any case, with colons, dashes, or no separator.
///
/// Left unbounded on purpose: the scanner reports bare 12-digit runs
/// found inside longer hex tokens, and those must be redacted too.
pub fn synthesize_mac(canonical: &str) -> Result<Matcher> {
    let digits = mac_digits(canonical)?;
    let octets: Vec<String> = (0..12)
        .step_by(2)
        .map(|i| case_expand(&digits[i..i + 2]))
        .collect();
    let branches: Vec<String> = ["", ":", "-"]
        .iter()
        .map(|sep| octets.join(sep))
        .collect();
    Matcher::new(branches.join("|"))
}
