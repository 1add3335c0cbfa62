use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::address::canonicalize_mac;

/// MAC grammar: colon separated, dash separated, or 12 bare hex digits.
///
/// The bare branch has no boundary check, so any 12-digit hex run inside a
/// longer token (hashes, serial numbers) is reported. This is a lossy
/// heuristic: the only run it rejects outright is one made entirely of
/// decimal digits.
pub static MAC_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"((?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2})",
        r"|((?:[0-9A-Fa-f]{2}-){5}[0-9A-Fa-f]{2})",
        r"|([0-9A-Fa-f]{12})",
    ))
    .expect("MAC grammar should compile")
});

/// Find every MAC address in `text`, returned as sorted canonical strings.
pub fn find_macs(text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for mat in MAC_GRAMMAR.find_iter(text) {
        let raw = mat.as_str();
        if is_decimal_run(raw) {
            continue;
        }
        match canonicalize_mac(raw) {
            Ok(mac) => {
                found.insert(mac);
            }
            Err(e) => tracing::debug!("dropping MAC candidate: {e}"),
        }
    }
    found.into_iter().collect()
}

/// A bare 12-digit run of decimal digits is far more likely a timestamp or
/// counter than a MAC.
fn is_decimal_run(raw: &str) -> bool {
    raw.len() == 12 && raw.bytes().all(|b| b.is_ascii_digit())
}
