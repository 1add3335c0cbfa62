use std::collections::BTreeSet;
use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::address::decompress_ipv6;

const OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
const TAIL_OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";
const GROUP: &str = r"[0-9A-Fa-f]{1,4}";

/// Left edge of a dotted IPv4 address: not after a `.` or word character,
/// and not the dotted tail of a compressed IPv6 literal (`64:ff9b::1.2.3.4`).
pub(crate) const IPV4_HEAD: &str = r"(?<![.\w])(?<!::)";
/// Right edge of a dotted IPv4 address: no word character, and no `.digit`
/// continuation (a sentence-ending dot is fine, a fifth dotted component is
/// not).
pub(crate) const IPV4_TAIL: &str = r"(?!\w|\.[0-9])";
/// Left edge of an IPv6 literal: not after a `.` or word character, and not
/// right after a standalone `group:` (the match would start in the middle of
/// a longer colon-separated run). `key:` prefixes such as `src:` still pass.
pub(crate) const IPV6_HEAD: &str = concat!(
    r"(?<![.\w])",
    r"(?<![^\w][0-9A-Fa-f]:)(?<![^\w][0-9A-Fa-f]{2}:)",
    r"(?<![^\w][0-9A-Fa-f]{3}:)(?<![^\w][0-9A-Fa-f]{4}:)",
    r"(?<!^[0-9A-Fa-f]:)(?<!^[0-9A-Fa-f]{2}:)",
    r"(?<!^[0-9A-Fa-f]{3}:)(?<!^[0-9A-Fa-f]{4}:)",
);
/// Right edge of an IPv6 literal: as for IPv4, and not followed by another
/// `:group`.
pub(crate) const IPV6_TAIL: &str = r"(?!\w|\.[0-9]|:[0-9A-Fa-f])";

/// Dotted-decimal IPv4. Version strings and longer digit runs are left
/// alone.
pub static IPV4_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"{IPV4_HEAD}{OCTET}(?:\.{OCTET}){{3}}{IPV4_TAIL}");
    Regex::new(&pattern).expect("IPv4 grammar should compile")
});

/// RFC 4291 text form: eight groups, at most one `::`, optional dotted tail.
/// Within each branch the dotted-tail choice comes first, so a tail is never
/// cut short at its leading `ffff` group.
pub static IPV6_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    let v4 = format!(r"{TAIL_OCTET}(?:\.{TAIL_OCTET}){{3}}");
    let g = GROUP;
    let branches = [
        format!(r"(?:{g}:){{7}}(?:{g}|:)"),
        format!(r"(?:{g}:){{6}}(?:{v4}|:{g}|:)"),
        format!(r"(?:{g}:){{5}}(?::{v4}|(?::{g}){{1,2}}|:)"),
        format!(r"(?:{g}:){{4}}(?:(?::{g})?:{v4}|(?::{g}){{1,3}}|:)"),
        format!(r"(?:{g}:){{3}}(?:(?::{g}){{0,2}}:{v4}|(?::{g}){{1,4}}|:)"),
        format!(r"(?:{g}:){{2}}(?:(?::{g}){{0,3}}:{v4}|(?::{g}){{1,5}}|:)"),
        format!(r"(?:{g}:)(?:(?::{g}){{0,4}}:{v4}|(?::{g}){{1,6}}|:)"),
        format!(r":(?:(?::{g}){{0,5}}:{v4}|(?::{g}){{1,7}}|:)"),
    ];
    let pattern = format!(r"{IPV6_HEAD}(?:{}){IPV6_TAIL}", branches.join("|"));
    Regex::new(&pattern).expect("IPv6 grammar should compile")
});

/// Raw (unnormalized) matches of a lookaround grammar. A backtracking
/// failure on one candidate only drops the rest of that search.
fn raw_matches<'t>(grammar: &Regex, text: &'t str) -> Vec<&'t str> {
    let mut out = Vec::new();
    for mat in grammar.find_iter(text) {
        match mat {
            Ok(m) => out.push(m.as_str()),
            Err(e) => {
                tracing::warn!("address scan aborted early: {e}");
                break;
            }
        }
    }
    out
}

/// Find every IPv4 address in `text`, sorted and deduplicated.
pub fn find_ipv4(text: &str) -> Vec<String> {
    let found: BTreeSet<String> = raw_matches(&IPV4_GRAMMAR, text)
        .into_iter()
        .map(str::to_string)
        .collect();
    found.into_iter().collect()
}

/// Find every IPv6 address in `text`, returned in canonical eight-group
/// uppercase form, sorted and deduplicated.
pub fn find_ipv6(text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for raw in raw_matches(&IPV6_GRAMMAR, text) {
        if looks_like_octet_run(raw) {
            tracing::debug!("dropping MAC-like IPv6 candidate {raw}");
            continue;
        }
        match decompress_ipv6(&raw.to_ascii_uppercase()) {
            Ok(canonical) => {
                found.insert(canonical);
            }
            Err(e) => tracing::warn!("dropping IPv6 candidate: {e}"),
        }
    }
    found.into_iter().collect()
}

/// Every written group is exactly two hex digits, e.g. an eight-octet
/// `AA:BB:CC:DD:EE:FF:00:11` identifier. Heuristic: such runs are treated
/// as MAC-like rather than as a compressed IPv6 literal.
fn looks_like_octet_run(raw: &str) -> bool {
    let mut groups = raw.split(':').filter(|g| !g.is_empty()).peekable();
    groups.peek().is_some()
        && groups.all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()))
}
