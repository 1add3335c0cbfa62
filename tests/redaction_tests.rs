//! End-to-end properties of scanning, matcher synthesis and the redaction map.

use netscrub::address::{add_colons_to_mac, decompress_ipv6};
use netscrub::pattern::{synthesize_ipv4, synthesize_mac};
use netscrub::redact::{apply, redact_text};
use netscrub::scan::{find_ipv4, find_ipv6, find_macs};
use netscrub::{AddressKind, NetscrubError, RedactionMap};

// ---------------------------------------------------------------------------
// Canonical forms
// ---------------------------------------------------------------------------

#[test]
fn decompress_expands_loopback_and_documentation_prefix() {
    assert_eq!(
        decompress_ipv6("::1").unwrap(),
        "0000:0000:0000:0000:0000:0000:0000:0001"
    );
    assert_eq!(
        decompress_ipv6("2001:db8::ff00:42:8329").unwrap(),
        "2001:0db8:0000:0000:0000:ff00:0042:8329"
    );
}

#[test]
fn add_colons_requires_twelve_hex_digits() {
    assert_eq!(add_colons_to_mac("001A2B3C4D5E").unwrap(), "00:1A:2B:3C:4D:5E");
    assert!(matches!(
        add_colons_to_mac("001A2B3C4D"),
        Err(NetscrubError::InvalidFormat { kind: AddressKind::Mac, .. })
    ));
    assert!(add_colons_to_mac("001A2B3C4D5G").is_err());
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

#[test]
fn scanners_find_mixed_log_line() {
    let line = "dhcp ack 10.1.2.3 to 00-1a-2b-3c-4d-5e via 2001:db8::1 (lease 3600)";
    assert_eq!(find_macs(line), vec!["00:1A:2B:3C:4D:5E"]);
    assert_eq!(find_ipv4(line), vec!["10.1.2.3"]);
    assert_eq!(
        find_ipv6(line),
        vec!["2001:0DB8:0000:0000:0000:0000:0000:0001"]
    );
}

#[test]
fn scanners_ignore_versions_and_timestamps() {
    let line = "build 1.2.3.4.5 at 202401011230 took 12:30:45";
    assert!(find_macs(line).is_empty());
    assert!(find_ipv4(line).is_empty());
    assert!(find_ipv6(line).is_empty());
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

#[test]
fn ipv4_matcher_covers_mapped_spellings() {
    let m = synthesize_ipv4("192.168.1.1").unwrap();
    assert!(m.is_full_match("192.168.1.1"));
    assert!(m.is_full_match("::ffff:192.168.1.1"));
    assert!(m.is_full_match("0000:0000:0000:0000:0000:ffff:c0a8:0101"));
}

#[test]
fn mac_matcher_does_not_match_other_macs() {
    let a = synthesize_mac("00:1A:2B:3C:4D:5E").unwrap();
    let b = synthesize_mac("AA:BB:CC:DD:EE:FF").unwrap();
    assert!(!a.is_full_match("AA:BB:CC:DD:EE:FF"));
    assert!(!b.is_full_match("00:1A:2B:3C:4D:5E"));
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

#[test]
fn two_macs_get_sequential_placeholders() {
    let input = "Two MACs: 00:1A:2B:3C:4D:5E and AA:BB:CC:DD:EE:FF";
    let (redacted, map) = redact_text(input, None);

    assert_eq!(map.count_of(AddressKind::Mac), 2);
    assert!(map.get("[REDACTED:MAC:1]").is_some());
    assert!(map.get("[REDACTED:MAC:2]").is_some());
    assert!(!redacted.contains("00:1A:2B:3C:4D:5E"));
    assert!(!redacted.contains("AA:BB:CC:DD:EE:FF"));
}

#[test]
fn separator_and_case_variants_share_one_entry() {
    let (redacted, map) = redact_text("AA:BB:CC:DD:EE:FF and aa-bb-cc-dd-ee-ff", None);
    assert_eq!(map.len(), 1);
    assert_eq!(redacted, "[REDACTED:MAC:1] and [REDACTED:MAC:1]");
}

#[test]
fn compressed_and_expanded_ipv6_share_one_entry() {
    let (redacted, map) = redact_text(
        "a 2001:db8::ff00:42:8329 b 2001:0DB8:0:0:0:FF00:0042:8329",
        None,
    );
    assert_eq!(map.count_of(AddressKind::Ipv6), 1);
    assert_eq!(redacted, "a [REDACTED:IPv6:1] b [REDACTED:IPv6:1]");
}

#[test]
fn loopback_does_not_eat_link_local_suffix() {
    let (redacted, map) = redact_text("gw fe80::1 lo ::1", None);
    assert_eq!(map.count_of(AddressKind::Ipv6), 2);
    assert_eq!(redacted, "gw [REDACTED:IPv6:2] lo [REDACTED:IPv6:1]");
}

#[test]
fn mapped_ipv6_is_redacted_as_its_ipv4() {
    let (redacted, map) = redact_text("peer ::ffff:192.168.1.1 and 192.168.1.1", None);
    assert_eq!(map.len(), 1);
    assert_eq!(redacted, "peer [REDACTED:IPv4:1] and [REDACTED:IPv4:1]");
}

#[test]
fn partially_compressed_spellings_share_one_entry() {
    let (redacted, map) = redact_text(
        "a 2001:db8::ff00:42:8329 b 2001:db8:0::ff00:42:8329 c 2001:db8::0:ff00:42:8329",
        None,
    );
    assert_eq!(map.count_of(AddressKind::Ipv6), 1);
    assert_eq!(
        redacted,
        "a [REDACTED:IPv6:1] b [REDACTED:IPv6:1] c [REDACTED:IPv6:1]"
    );
}

#[test]
fn mapped_ipv6_with_leading_zero_group_is_redacted_whole() {
    let (redacted, map) = redact_text("peer 0::ffff:c0a8:101 x", None);
    assert_eq!(map.len(), 1);
    assert_eq!(redacted, "peer [REDACTED:IPv4:1] x");
}

#[test]
fn ipv4_added_after_its_mapped_ipv6_entry_is_still_redacted() {
    let map = RedactionMap::build(
        &["0000:0000:0000:0000:0000:FFFF:C0A8:0101"],
        AddressKind::Ipv6,
    );
    let (redacted, map) = redact_text("host 192.168.1.1 up", Some(map));
    assert_eq!(map.len(), 2);
    assert_eq!(redacted, "host [REDACTED:IPv4:1] up");
    assert_eq!(
        apply(&map, "peer ::ffff:c0a8:101"),
        "peer [REDACTED:IPv6:1]"
    );
}

#[test]
fn nat64_address_with_dotted_tail_is_redacted_whole() {
    let (redacted, map) = redact_text("nat64 64:ff9b::192.0.2.33 z", None);
    assert_eq!(map.len(), 1);
    assert_eq!(map.count_of(AddressKind::Ipv6), 1);
    assert_eq!(redacted, "nat64 [REDACTED:IPv6:1] z");
}

#[test]
fn explicit_dotted_tail_is_claimed_by_ipv6_first() {
    let (redacted, _) = redact_text("gw 64:ff9b:0:0:0:0:192.0.2.33 z", None);
    assert_eq!(redacted, "gw [REDACTED:IPv6:1] z");
}

#[test]
fn dotted_version_strings_are_left_alone() {
    let map = RedactionMap::build(&["1.2.3.4"], AddressKind::Ipv4);
    assert_eq!(apply(&map, "ver 1.2.3.4.5"), "ver 1.2.3.4.5");
    assert_eq!(apply(&map, "ip 1.2.3.4."), "ip [REDACTED:IPv4:1].");
    let (redacted, map) = redact_text("ver 1.2.3.4.5", None);
    assert!(map.is_empty());
    assert_eq!(redacted, "ver 1.2.3.4.5");
}

#[test]
fn redaction_is_idempotent() {
    let input = "mac 00:1A:2B:3C:4D:5E ip 10.0.0.1 v6 ::1 any ::";
    let (once, map) = redact_text(input, None);
    assert_eq!(apply(&map, &once), once);

    let (twice, map_after) = redact_text(&once, Some(map.clone()));
    assert_eq!(twice, once);
    assert_eq!(map_after, map);
}

#[test]
fn extending_with_a_variant_adds_nothing() {
    let mut map = RedactionMap::build(&["AA:BB:CC:DD:EE:FF"], AddressKind::Mac);
    let variants = find_macs("aa-bb-cc-dd-ee-ff aabbccddeeff");
    assert_eq!(map.extend(&variants, AddressKind::Mac), 0);
    assert_eq!(map.len(), 1);
}

#[test]
fn second_session_keeps_existing_numbering() {
    let (_, map) = redact_text("first 10.0.0.5", None);
    let (redacted, map) = redact_text("second 10.0.0.9 then 10.0.0.5", Some(map));
    assert_eq!(redacted, "second [REDACTED:IPv4:2] then [REDACTED:IPv4:1]");
    assert_eq!(map.len(), 2);
}

#[test]
fn one_bad_address_does_not_spoil_the_batch() {
    let map = RedactionMap::build(
        &["2001:db8::1", "0000:0000:0000:0000:0000:0000:0000:0001"],
        AddressKind::Ipv6,
    );
    assert_eq!(map.len(), 1);
    assert_eq!(apply(&map, "lo ::1"), "lo [REDACTED:IPv6:1]");
}

// ---------------------------------------------------------------------------
// Persistence and reversal
// ---------------------------------------------------------------------------

#[test]
fn map_survives_save_and_load() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("maps/run.json");

    let (redacted, map) = redact_text("10.0.0.1 aa:bb:cc:dd:ee:ff fe80::1", None);
    map.save(&path).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("created_at"));
    assert!(json.contains("[REDACTED:MAC:1]"));

    let loaded = RedactionMap::load(&path).unwrap();
    assert_eq!(loaded, map);
    assert_eq!(apply(&loaded, "10.0.0.1 aa:bb:cc:dd:ee:ff fe80::1"), redacted);
}

#[test]
fn load_rejects_garbage() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("map.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(
        RedactionMap::load(&path),
        Err(NetscrubError::Json(_))
    ));
}

#[test]
fn restore_returns_canonical_originals() {
    let (redacted, map) = redact_text("AA:BB:CC:DD:EE:FF and aa-bb-cc-dd-ee-ff", None);
    assert_eq!(
        map.restore(&redacted).unwrap(),
        "AA:BB:CC:DD:EE:FF and AA:BB:CC:DD:EE:FF"
    );
}
