use serde::{Deserialize, Serialize};

use crate::error::{NetscrubError, Result};

/// The three families of network identifier the engine redacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressKind {
    #[serde(rename = "MAC")]
    Mac,
    #[serde(rename = "IPv6")]
    Ipv6,
    #[serde(rename = "IPv4")]
    Ipv4,
}

impl AddressKind {
    /// All kinds, in the order a corpus pass extends the map. IPv6 comes
    /// before IPv4 so an IPv6 literal with a dotted tail is substituted
    /// whole before the tail could match on its own.
    pub const ALL: [AddressKind; 3] = [AddressKind::Mac, AddressKind::Ipv6, AddressKind::Ipv4];

    /// Label used inside placeholder tokens.
    pub fn label(&self) -> &'static str {
        match self {
            AddressKind::Mac => "MAC",
            AddressKind::Ipv4 => "IPv4",
            AddressKind::Ipv6 => "IPv6",
        }
    }
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AddressKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mac" => Ok(AddressKind::Mac),
            "ipv4" => Ok(AddressKind::Ipv4),
            "ipv6" => Ok(AddressKind::Ipv6),
            _ => Err(format!("unknown address kind: {s}")),
        }
    }
}

/// Insert colons between the six octets of a bare 12-digit MAC.
///
/// ```
/// assert_eq!(
///     netscrub::address::add_colons_to_mac("0123456789AB").unwrap(),
///     "01:23:45:67:89:AB"
/// );
/// ```
pub fn add_colons_to_mac(mac: &str) -> Result<String> {
    if mac.len() != 12 {
        return Err(NetscrubError::invalid(
            AddressKind::Mac,
            mac,
            format!("expected 12 hex digits, got {} characters", mac.len()),
        ));
    }
    if !mac.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(NetscrubError::invalid(
            AddressKind::Mac,
            mac,
            "contains non-hex characters",
        ));
    }
    let octets: Vec<&str> = (0..12).step_by(2).map(|i| &mac[i..i + 2]).collect();
    Ok(octets.join(":"))
}

/// Canonical MAC form: uppercase, colon separated.
pub fn canonicalize_mac(raw: &str) -> Result<String> {
    let upper = raw.to_ascii_uppercase();
    if upper.contains('-') {
        Ok(upper.replace('-', ":"))
    } else if upper.contains(':') {
        Ok(upper)
    } else {
        add_colons_to_mac(&upper)
    }
}

/// The 12 hex digits of a MAC with separators removed.
pub(crate) fn mac_digits(mac: &str) -> Result<String> {
    let digits: String = mac.chars().filter(|c| *c != ':' && *c != '-').collect();
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(NetscrubError::invalid(
            AddressKind::Mac,
            mac,
            "expected six octets of two hex digits",
        ));
    }
    Ok(digits)
}

/// Parse a dotted-decimal IPv4 literal into its four octets.
pub(crate) fn ipv4_octets(address: &str) -> Result<[u8; 4]> {
    let parts: Vec<&str> = address.split('.').collect();
    if parts.len() != 4 {
        return Err(NetscrubError::invalid(
            AddressKind::Ipv4,
            address,
            format!("expected 4 octets, got {}", parts.len()),
        ));
    }
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NetscrubError::invalid(
                AddressKind::Ipv4,
                address,
                format!("bad octet {part:?}"),
            ));
        }
        *slot = part.parse::<u8>().map_err(|_| {
            NetscrubError::invalid(AddressKind::Ipv4, address, format!("octet {part} > 255"))
        })?;
    }
    Ok(octets)
}

/// Expand a compressed IPv6 literal to eight zero-padded groups.
///
/// Group case is preserved. A dotted IPv4 tail is rewritten as two
/// uppercase hex groups so the result always holds exactly eight groups.
///
/// ```
/// use netscrub::address::decompress_ipv6;
/// assert_eq!(decompress_ipv6("::1").unwrap(), "0000:0000:0000:0000:0000:0000:0000:0001");
/// assert_eq!(
///     decompress_ipv6("2001:db8::ff00:42:8329").unwrap(),
///     "2001:0db8:0000:0000:0000:ff00:0042:8329"
/// );
/// ```
pub fn decompress_ipv6(address: &str) -> Result<String> {
    let halves: Vec<&str> = address.split("::").collect();
    if halves.len() > 2 {
        return Err(NetscrubError::invalid(
            AddressKind::Ipv6,
            address,
            "more than one '::'",
        ));
    }

    let compressed = halves.len() == 2;
    let tail_half = halves.len() - 1;
    let mut parsed: Vec<Vec<String>> = Vec::with_capacity(2);
    for (index, half) in halves.iter().enumerate() {
        parsed.push(expand_half(address, half, index == tail_half)?);
    }

    let written: usize = parsed.iter().map(Vec::len).sum();
    let groups: Vec<String> = if compressed {
        if written > 7 {
            return Err(NetscrubError::invalid(
                AddressKind::Ipv6,
                address,
                format!("{written} groups leave no room for '::'"),
            ));
        }
        let mut groups = parsed[0].clone();
        groups.extend(std::iter::repeat("0000".to_string()).take(8 - written));
        groups.extend(parsed[1].iter().cloned());
        groups
    } else {
        parsed.swap_remove(0)
    };

    if groups.len() != 8 {
        return Err(NetscrubError::invalid(
            AddressKind::Ipv6,
            address,
            format!("expected 8 groups, got {}", groups.len()),
        ));
    }
    Ok(groups.join(":"))
}

fn expand_half(address: &str, half: &str, holds_tail: bool) -> Result<Vec<String>> {
    if half.is_empty() {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = half.split(':').collect();
    let last = parts.len() - 1;
    let mut groups = Vec::with_capacity(parts.len() + 1);
    for (index, part) in parts.iter().enumerate() {
        if part.contains('.') {
            if !(holds_tail && index == last) {
                return Err(NetscrubError::invalid(
                    AddressKind::Ipv6,
                    address,
                    "embedded IPv4 must be the final component",
                ));
            }
            let [a, b, c, d] = ipv4_octets(part)?;
            groups.push(format!("{a:02X}{b:02X}"));
            groups.push(format!("{c:02X}{d:02X}"));
            continue;
        }
        if part.is_empty() || part.len() > 4 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(NetscrubError::invalid(
                AddressKind::Ipv6,
                address,
                format!("bad group {part:?}"),
            ));
        }
        groups.push(format!("{part:0>4}"));
    }
    Ok(groups)
}

/// Dotted IPv4 address carried by a canonical `::ffff:0:0/96` IPv6 address.
pub fn ipv4_mapped(canonical: &str) -> Option<String> {
    let groups: Vec<&str> = canonical.split(':').collect();
    if groups.len() != 8 {
        return None;
    }
    if !groups[..5].iter().all(|g| g.bytes().all(|b| b == b'0')) {
        return None;
    }
    if !groups[5].eq_ignore_ascii_case("ffff") {
        return None;
    }
    let high = u16::from_str_radix(groups[6], 16).ok()?;
    let low = u16::from_str_radix(groups[7], 16).ok()?;
    Some(format!(
        "{}.{}.{}.{}",
        high >> 8,
        high & 0xff,
        low >> 8,
        low & 0xff
    ))
}
