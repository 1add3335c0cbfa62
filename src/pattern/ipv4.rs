use crate::address::ipv4_octets;
use crate::error::Result;
use crate::scan::ip::{IPV4_HEAD, IPV4_TAIL, IPV6_HEAD, IPV6_TAIL};

use super::ipv6::{spellings, ZERO_GROUP};
use super::{elide_leading_zeros, Matcher};

/// Matcher for an IPv4 address in dotted form or embedded in an
/// IPv4-mapped IPv6 address (`::ffff:192.168.1.1`, `::ffff:c0a8:101`,
/// `0:0:0:0:0:ffff:c0a8:0101` and every other compression of the
/// `0:0:0:0:0:ffff` prefix).
pub fn synthesize_ipv4(canonical: &str) -> Result<Matcher> {
    let [a, b, c, d] = ipv4_octets(canonical)?;
    let dotted = regex::escape(canonical);
    let high = elide_leading_zeros(&format!("{a:02x}{b:02x}"));
    let low = elide_leading_zeros(&format!("{c:02x}{d:02x}"));

    let mut tokens = vec![ZERO_GROUP.to_string(); 5];
    tokens.push("[Ff]{4}".to_string());
    tokens.push(format!("(?:{dotted}|{high}:{low})"));
    let mut zero = vec![true; 5];
    zero.extend([false, false]);
    let mapped = spellings(&tokens, &zero).join("|");

    Matcher::new(format!(
        "{IPV4_HEAD}{dotted}{IPV4_TAIL}|{IPV6_HEAD}(?:{mapped}){IPV6_TAIL}"
    ))
}

/// Matcher for the dotted spelling only, for an address whose mapped IPv6
/// form already has an entry of its own.
pub fn synthesize_ipv4_dotted(canonical: &str) -> Result<Matcher> {
    ipv4_octets(canonical)?;
    let dotted = regex::escape(canonical);
    Matcher::new(format!("{IPV4_HEAD}{dotted}{IPV4_TAIL}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_dotted_and_mapped() {
        let m = synthesize_ipv4("192.168.1.1").unwrap();
        for spelling in [
            "192.168.1.1",
            "::ffff:192.168.1.1",
            "::FFFF:192.168.1.1",
            "0000:0000:0000:0000:0000:ffff:c0a8:0101",
            "0:0:0:0:0:FFFF:C0A8:101",
            "::ffff:c0a8:101",
            "0::ffff:c0a8:101",
            "0:0::ffff:192.168.1.1",
            "::0:ffff:c0a8:101",
        ] {
            assert!(m.is_full_match(spelling), "{spelling}");
        }
    }

    #[test]
    fn test_matches_canonical_mapped_ipv6() {
        let m = synthesize_ipv4("192.168.1.1").unwrap();
        assert!(m.is_full_match("0000:0000:0000:0000:0000:FFFF:C0A8:0101"));
    }

    #[test]
    fn test_zero_address_words() {
        let m = synthesize_ipv4("0.0.0.0").unwrap();
        assert!(m.is_full_match("::ffff:0:0"));
        assert!(m.is_full_match("::ffff:0000:0000"));
    }

    #[test]
    fn test_dots_are_literal() {
        let m = synthesize_ipv4("10.0.0.2").unwrap();
        assert!(!m.is_full_match("10a0b0c2"));
        assert!(!m.is_full_match("10.0.0.3"));
    }

    #[test]
    fn test_not_inside_longer_numbers() {
        let m = synthesize_ipv4("1.1.1.1").unwrap();
        assert!(!m.is_match("11.1.1.10"));
        assert!(m.is_match("dns 1.1.1.1, ok"));
    }

    #[test]
    fn test_not_inside_dotted_version() {
        let m = synthesize_ipv4("1.2.3.4").unwrap();
        assert!(!m.is_match("ver 1.2.3.4.5"));
        assert!(!m.is_match("ver 5.1.2.3.4"));
        assert!(!m.is_match("nat64 64:ff9b::1.2.3.4"));
        assert!(m.is_match("ip 1.2.3.4."));
    }

    #[test]
    fn test_dotted_only_matcher() {
        let m = synthesize_ipv4_dotted("192.168.1.1").unwrap();
        assert!(m.is_full_match("192.168.1.1"));
        assert!(!m.is_full_match("::ffff:c0a8:101"));
        assert!(!m.is_full_match("::ffff:192.168.1.1"));
        assert!(synthesize_ipv4_dotted("1.2.3").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(synthesize_ipv4("1.2.3").is_err());
        assert!(synthesize_ipv4("1.2.3.999").is_err());
    }
}
