use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::address::AddressKind;
use crate::error::Result;

use super::Redactor;

/// Plain `original -> replacement` dictionary.
///
/// Used when no matcher-based map is available. Matching is exact: each
/// original is looked up only in its uppercase and lowercase spelling, so a
/// MAC written with a different separator, or an IPv6 address compressed
/// differently, is not recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyMap {
    entries: IndexMap<String, String>,
    /// Draw MAC surrogates from the locally administered range.
    #[serde(skip)]
    local_macs: bool,
}

impl LegacyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate locally administered MAC surrogates from now on. Existing
    /// entries keep their replacement.
    pub fn with_local_macs(mut self, local: bool) -> Self {
        self.local_macs = local;
        self
    }

    pub fn insert(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
        self.entries.insert(original.into(), replacement.into());
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a random surrogate for every address not already a key.
    pub fn extend<S: AsRef<str>>(&mut self, addresses: &[S], kind: AddressKind) -> usize {
        self.extend_with(addresses, kind, &mut rand::thread_rng())
    }

    /// [`LegacyMap::extend`] with a caller-supplied random source.
    pub fn extend_with<S: AsRef<str>, R: Rng + ?Sized>(
        &mut self,
        addresses: &[S],
        kind: AddressKind,
        rng: &mut R,
    ) -> usize {
        let mut added = 0;
        let local_macs = self.local_macs;
        for address in addresses {
            let address = address.as_ref();
            if self.entries.contains_key(address) {
                continue;
            }
            let surrogate = loop {
                let candidate = random_address(kind, local_macs, rng);
                if candidate != address && !self.entries.values().any(|v| *v == candidate) {
                    break candidate;
                }
            };
            self.entries.insert(address.to_string(), surrogate);
            added += 1;
        }
        added
    }

    /// Replace the uppercase and lowercase spelling of every original.
    pub fn apply(&self, text: &str) -> String {
        let mut needles: Vec<String> = Vec::with_capacity(self.entries.len() * 2);
        let mut replacements: Vec<&str> = Vec::with_capacity(self.entries.len() * 2);
        for (original, replacement) in &self.entries {
            let upper = original.to_uppercase();
            let lower = original.to_lowercase();
            if upper != lower {
                needles.push(lower);
                replacements.push(replacement);
            }
            needles.push(upper);
            replacements.push(replacement);
        }
        if needles.is_empty() {
            return text.to_string();
        }

        match AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&needles)
        {
            Ok(automaton) => automaton.replace_all(text, &replacements),
            Err(e) => {
                tracing::warn!("legacy automaton failed to build, replacing sequentially: {e}");
                needles
                    .iter()
                    .zip(&replacements)
                    .fold(text.to_string(), |acc, (needle, replacement)| {
                        acc.replace(needle.as_str(), replacement)
                    })
            }
        }
    }

    /// Read a JSON object of `original: replacement` pairs.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl Redactor for LegacyMap {
    fn redact(&self, input: &str) -> String {
        self.apply(input)
    }

    fn name(&self) -> &str {
        "legacy-map"
    }
}

fn random_address<R: Rng + ?Sized>(kind: AddressKind, local_macs: bool, rng: &mut R) -> String {
    match kind {
        AddressKind::Mac if local_macs => generate_random_local_mac(rng),
        AddressKind::Mac => generate_random_mac(rng),
        AddressKind::Ipv4 => generate_random_ipv4(rng),
        AddressKind::Ipv6 => generate_random_ipv6(rng),
    }
}

/// Random MAC, lowercase, colon separated.
pub fn generate_random_mac<R: Rng + ?Sized>(rng: &mut R) -> String {
    let octets: Vec<String> = (0..6).map(|_| format!("{:02x}", rng.gen::<u8>())).collect();
    octets.join(":")
}

/// Random locally administered MAC: bit 1 of the first octet is set.
pub fn generate_random_local_mac<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut octets = [0u8; 6];
    rng.fill(&mut octets[..]);
    octets[0] |= 0b10;
    octets
        .iter()
        .map(|o| format!("{o:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

pub fn generate_random_ipv4<R: Rng + ?Sized>(rng: &mut R) -> String {
    let octets: Vec<String> = (0..4).map(|_| rng.gen::<u8>().to_string()).collect();
    octets.join(".")
}

/// Random IPv6 address, eight unpadded lowercase groups.
pub fn generate_random_ipv6<R: Rng + ?Sized>(rng: &mut R) -> String {
    let groups: Vec<String> = (0..8).map(|_| format!("{:x}", rng.gen::<u16>())).collect();
    groups.join(":")
}
