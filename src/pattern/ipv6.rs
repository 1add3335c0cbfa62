use crate::address::AddressKind;
use crate::error::{NetscrubError, Result};
use crate::scan::ip::{IPV6_HEAD, IPV6_TAIL};

use super::{elide_leading_zeros, Matcher};

/// A zero group with its leading zeros elided.
pub(crate) const ZERO_GROUP: &str = "0{1,4}";

/// Matcher for an IPv6 address in every case, with or without leading
/// zeros, fully written or with `::` standing for one or more groups of any
/// run of zero groups, and with the last two groups optionally written as a
/// dotted IPv4 tail (`64:ff9b::192.0.2.33`).
pub fn synthesize_ipv6(canonical: &str) -> Result<Matcher> {
    let groups = parse_groups(canonical)?;
    let mut tokens: Vec<String> = groups.iter().map(|g| elide_leading_zeros(g)).collect();
    let mut zero: Vec<bool> = groups.iter().map(|g| is_zero(g)).collect();

    let mut branches = spellings(&tokens, &zero);

    let [a, b] = word_bytes(&groups[6]);
    let [c, d] = word_bytes(&groups[7]);
    tokens.truncate(6);
    zero.truncate(6);
    tokens.push(regex::escape(&format!("{a}.{b}.{c}.{d}")));
    zero.push(false);
    branches.extend(spellings(&tokens, &zero));

    Matcher::new(format!("{IPV6_HEAD}(?:{}){IPV6_TAIL}", branches.join("|")))
}

/// Every way of writing a colon-separated sequence of group patterns:
/// fully written, then for each maximal run of zero groups, `::` standing
/// for one or more of the run's groups with the rest written out on either
/// side.
///
/// `tokens` are the per-group patterns, `zero[i]` marks the groups that may
/// be compressed.
pub(crate) fn spellings(tokens: &[String], zero: &[bool]) -> Vec<String> {
    let mut out = vec![tokens.join(":")];
    for (start, end) in zero_runs(zero) {
        let run = end - start;
        let suffix = tokens[end..].join(":");
        for left_zeros in 0..run {
            let spare = run - 1 - left_zeros;

            let mut left: Vec<&str> = tokens[..start].iter().map(String::as_str).collect();
            left.extend(std::iter::repeat(ZERO_GROUP).take(left_zeros));

            let right = match (suffix.is_empty(), spare) {
                (_, 0) => suffix.clone(),
                (false, n) => format!("(?:{ZERO_GROUP}:){{0,{n}}}{suffix}"),
                (true, 1) => format!("(?:{ZERO_GROUP})?"),
                (true, n) => format!("(?:{ZERO_GROUP}(?::{ZERO_GROUP}){{0,{}}})?", n - 1),
            };
            out.push(format!("{}::{right}", left.join(":")));
        }
    }
    out
}

fn parse_groups(canonical: &str) -> Result<Vec<String>> {
    let groups: Vec<&str> = canonical.split(':').collect();
    if groups.len() != 8 {
        return Err(NetscrubError::invalid(
            AddressKind::Ipv6,
            canonical,
            format!("expected 8 groups, got {}", groups.len()),
        ));
    }
    groups
        .into_iter()
        .map(|g| {
            if g.is_empty() || g.len() > 4 || !g.bytes().all(|b| b.is_ascii_hexdigit()) {
                Err(NetscrubError::invalid(
                    AddressKind::Ipv6,
                    canonical,
                    format!("bad group {g:?}"),
                ))
            } else {
                Ok(format!("{g:0>4}"))
            }
        })
        .collect()
}

fn is_zero(group: &str) -> bool {
    group.bytes().all(|b| b == b'0')
}

/// High and low byte of a validated four-digit group.
fn word_bytes(group: &str) -> [u8; 2] {
    u16::from_str_radix(group, 16).unwrap_or_default().to_be_bytes()
}

/// Half-open index ranges of every maximal run of compressible groups.
fn zero_runs(zero: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (index, &is_zero) in zero.iter().enumerate() {
        match (is_zero, start) {
            (true, None) => start = Some(index),
            (false, Some(s)) => {
                runs.push((s, index));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, zero.len()));
    }
    runs
}
