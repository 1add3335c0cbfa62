pub mod ip;
pub mod mac;

pub use ip::{find_ipv4, find_ipv6};
pub use mac::find_macs;

use std::collections::BTreeSet;

use crate::address::{ipv4_mapped, AddressKind};

/// Canonical addresses discovered in one or more documents, per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet {
    pub macs: BTreeSet<String>,
    pub ipv4: BTreeSet<String>,
    pub ipv6: BTreeSet<String>,
}

impl AddressSet {
    /// Scan `text` for every kind in `kinds`.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d` in any spelling) are
    /// recorded as the IPv4 address they carry when IPv4 is enabled, so the
    /// IPv4 entry owns every spelling of that address.
    pub fn scan(text: &str, kinds: &[AddressKind]) -> Self {
        let mut set = Self::default();
        if kinds.contains(&AddressKind::Mac) {
            set.macs.extend(find_macs(text));
        }
        let want_ipv4 = kinds.contains(&AddressKind::Ipv4);
        if want_ipv4 {
            set.ipv4.extend(find_ipv4(text));
        }
        if kinds.contains(&AddressKind::Ipv6) {
            for address in find_ipv6(text) {
                match ipv4_mapped(&address) {
                    Some(v4) if want_ipv4 => {
                        set.ipv4.insert(v4);
                    }
                    _ => {
                        set.ipv6.insert(address);
                    }
                }
            }
        }
        set
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: AddressSet) {
        self.macs.extend(other.macs);
        self.ipv4.extend(other.ipv4);
        self.ipv6.extend(other.ipv6);
    }

    pub fn get(&self, kind: AddressKind) -> &BTreeSet<String> {
        match kind {
            AddressKind::Mac => &self.macs,
            AddressKind::Ipv4 => &self.ipv4,
            AddressKind::Ipv6 => &self.ipv6,
        }
    }

    /// Sorted addresses of one kind.
    pub fn sorted(&self, kind: AddressKind) -> Vec<String> {
        self.get(kind).iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.macs.len() + self.ipv4.len() + self.ipv6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_all_kinds() {
        let set = AddressSet::scan(
            "host 10.0.0.1 mac 00-1a-2b-3c-4d-5e via fe80::1",
            &AddressKind::ALL,
        );
        assert_eq!(set.sorted(AddressKind::Mac), vec!["00:1A:2B:3C:4D:5E"]);
        assert_eq!(set.sorted(AddressKind::Ipv4), vec!["10.0.0.1"]);
        assert_eq!(
            set.sorted(AddressKind::Ipv6),
            vec!["FE80:0000:0000:0000:0000:0000:0000:0001"]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_scan_respects_kinds() {
        let set = AddressSet::scan("10.0.0.1 00:1A:2B:3C:4D:5E", &[AddressKind::Mac]);
        assert!(set.ipv4.is_empty());
        assert_eq!(set.macs.len(), 1);
    }

    #[test]
    fn test_mapped_ipv6_folds_into_ipv4() {
        let set = AddressSet::scan("peer ::ffff:c0a8:101 up", &AddressKind::ALL);
        assert!(set.ipv6.is_empty());
        assert_eq!(set.sorted(AddressKind::Ipv4), vec!["192.168.1.1"]);
    }

    #[test]
    fn test_mapped_ipv6_kept_without_ipv4() {
        let set = AddressSet::scan("peer ::ffff:c0a8:101 up", &[AddressKind::Ipv6]);
        assert_eq!(set.ipv6.len(), 1);
    }

    #[test]
    fn test_merge_unions() {
        let mut a = AddressSet::scan("10.0.0.1", &AddressKind::ALL);
        a.merge(AddressSet::scan("10.0.0.1 10.0.0.2", &AddressKind::ALL));
        assert_eq!(a.sorted(AddressKind::Ipv4), vec!["10.0.0.1", "10.0.0.2"]);
        assert!(!a.is_empty());
    }
}
