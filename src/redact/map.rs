use std::path::Path;

use aho_corasick::AhoCorasick;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::address::{ipv4_mapped, AddressKind};
use crate::error::{NetscrubError, Result};
use crate::pattern::ipv4::synthesize_ipv4_dotted;
use crate::pattern::{synthesize, Matcher};

use super::Redactor;

/// Placeholder token for the `index`-th address of `kind`.
pub fn placeholder(kind: AddressKind, index: u64) -> String {
    format!("[REDACTED:{}:{index}]", kind.label())
}

/// Split a placeholder back into its kind and counter.
pub fn parse_placeholder(token: &str) -> Option<(AddressKind, u64)> {
    let inner = token.strip_prefix("[REDACTED:")?.strip_suffix(']')?;
    let (label, index) = inner.rsplit_once(':')?;
    let kind = AddressKind::ALL.into_iter().find(|k| k.label() == label)?;
    let index = index.parse().ok()?;
    Some((kind, index))
}

/// One redacted address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct RedactionEntry {
    pub placeholder: String,
    pub kind: AddressKind,
    /// Canonical form of the address this entry stands for.
    pub original: String,
    pub matcher: Matcher,
}

/// On-disk shape of an entry; the matcher is stored as pattern source.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    placeholder: String,
    kind: AddressKind,
    original: String,
    pattern: String,
}

impl From<RedactionEntry> for EntryRecord {
    fn from(entry: RedactionEntry) -> Self {
        Self {
            pattern: entry.matcher.source().to_string(),
            placeholder: entry.placeholder,
            kind: entry.kind,
            original: entry.original,
        }
    }
}

impl TryFrom<EntryRecord> for RedactionEntry {
    type Error = NetscrubError;

    fn try_from(record: EntryRecord) -> Result<Self> {
        match parse_placeholder(&record.placeholder) {
            Some((kind, _)) if kind == record.kind => {}
            _ => {
                return Err(NetscrubError::MapFormat {
                    reason: format!(
                        "placeholder {} does not name a {} entry",
                        record.placeholder, record.kind
                    ),
                })
            }
        }
        Ok(Self {
            matcher: Matcher::new(record.pattern)?,
            placeholder: record.placeholder,
            kind: record.kind,
            original: record.original,
        })
    }
}

/// Ordered placeholder -> entry map. Insertion order is substitution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RedactionEntry>", into = "Vec<RedactionEntry>")]
pub struct RedactionMap {
    entries: IndexMap<String, RedactionEntry>,
}

impl TryFrom<Vec<RedactionEntry>> for RedactionMap {
    type Error = NetscrubError;

    fn try_from(list: Vec<RedactionEntry>) -> Result<Self> {
        let mut entries = IndexMap::with_capacity(list.len());
        for entry in list {
            if entries.contains_key(&entry.placeholder) {
                return Err(NetscrubError::MapFormat {
                    reason: format!("duplicate placeholder {}", entry.placeholder),
                });
            }
            entries.insert(entry.placeholder.clone(), entry);
        }
        Ok(Self { entries })
    }
}

impl From<RedactionMap> for Vec<RedactionEntry> {
    fn from(map: RedactionMap) -> Self {
        map.entries.into_values().collect()
    }
}

/// Persisted map with the time it was written.
#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    created_at: DateTime<Utc>,
    entries: RedactionMap,
}

impl RedactionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh map over `addresses`, numbered from 1.
    pub fn build<S: AsRef<str>>(addresses: &[S], kind: AddressKind) -> Self {
        let mut map = Self::new();
        map.extend(addresses, kind);
        map
    }

    /// Add an entry for every address not already covered by the map.
    /// Returns the number of entries added.
    ///
    /// An address is covered when any existing matcher fully matches it, so
    /// a new spelling of a known address folds into the existing
    /// placeholder. A new matcher that would fully match an existing
    /// original is refused as well, keeping entries mutually exclusive.
    /// The one exception is an IPv4 address whose mapped IPv6 form is
    /// already an entry: it gets a dotted-only matcher instead.
    /// Addresses whose matcher cannot be built are logged and skipped.
    pub fn extend<S: AsRef<str>>(&mut self, addresses: &[S], kind: AddressKind) -> usize {
        let mut next = self.next_index(kind);
        let mut added = 0;

        for address in addresses {
            let address = address.as_ref();
            if let Some(existing) = self.covering(address) {
                tracing::debug!("{address} already covered by {}", existing.placeholder);
                continue;
            }
            let matcher = match synthesize(kind, address) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("skipping {kind} address: {e}");
                    continue;
                }
            };
            let matcher = match self.clashing(&matcher) {
                None => matcher,
                Some(clash) if owns_mapped_form(clash, kind, address) => {
                    tracing::debug!(
                        "{address}: mapped form belongs to {}, matching dotted spelling only",
                        clash.placeholder
                    );
                    match synthesize_ipv4_dotted(address) {
                        Ok(m) => m,
                        Err(e) => {
                            tracing::warn!("skipping {kind} address: {e}");
                            continue;
                        }
                    }
                }
                Some(clash) => {
                    tracing::warn!(
                        "skipping {kind} address {address}: its pattern also matches {} ({})",
                        clash.original,
                        clash.placeholder
                    );
                    continue;
                }
            };

            let token = placeholder(kind, next);
            next += 1;
            added += 1;
            self.entries.insert(
                token.clone(),
                RedactionEntry {
                    placeholder: token,
                    kind,
                    original: address.to_string(),
                    matcher,
                },
            );
        }

        if added > 0 {
            tracing::debug!(added, %kind, total = self.entries.len(), "extended redaction map");
        }
        added
    }

    /// Next counter for `kind`: one past the highest in use, so counters
    /// never repeat even if the map has gaps.
    fn next_index(&self, kind: AddressKind) -> u64 {
        self.entries
            .keys()
            .filter_map(|p| parse_placeholder(p))
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// An entry whose original `matcher` would also claim.
    fn clashing(&self, matcher: &Matcher) -> Option<&RedactionEntry> {
        self.entries
            .values()
            .find(|e| matcher.is_full_match(&e.original))
    }

    fn covering(&self, address: &str) -> Option<&RedactionEntry> {
        self.entries
            .values()
            .find(|e| e.matcher.is_full_match(address))
    }

    /// True when some entry already stands for `address`.
    pub fn covers(&self, address: &str) -> bool {
        self.covering(address).is_some()
    }

    pub fn get(&self, placeholder: &str) -> Option<&RedactionEntry> {
        self.entries.get(placeholder)
    }

    /// Entries in substitution order.
    pub fn iter(&self) -> impl Iterator<Item = &RedactionEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of one kind.
    pub fn count_of(&self, kind: AddressKind) -> usize {
        self.entries.values().filter(|e| e.kind == kind).count()
    }

    /// Substitute every entry's placeholder for its matches, entry by entry.
    ///
    /// An entry whose matcher fails at run time is logged and skipped; the
    /// remaining entries still apply.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for entry in self.entries.values() {
            match entry.matcher.replace_all(&result, &entry.placeholder) {
                Ok(replaced) => result = replaced.into_owned(),
                Err(e) => tracing::warn!("{} not applied: {e}", entry.placeholder),
            }
        }
        result
    }

    /// Put the canonical original back in place of every placeholder.
    pub fn restore(&self, text: &str) -> Result<String> {
        if self.entries.is_empty() {
            return Ok(text.to_string());
        }
        let placeholders: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        let originals: Vec<&str> = self.entries.values().map(|e| e.original.as_str()).collect();
        let automaton = AhoCorasick::new(&placeholders).map_err(|e| NetscrubError::Pattern {
            pattern: "<placeholders>".into(),
            reason: e.to_string(),
        })?;
        Ok(automaton.replace_all(text, &originals))
    }

    /// Write the map as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = MapFile {
            created_at: Utc::now(),
            entries: self.clone(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Read a map written by [`RedactionMap::save`], recompiling every
    /// matcher.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: MapFile = serde_json::from_str(&contents)?;
        tracing::debug!(
            "loaded {} entries from {} (written {})",
            file.entries.len(),
            path.display(),
            file.created_at
        );
        Ok(file.entries)
    }
}

/// True when `clash` is the IPv6 entry for the mapped form of the IPv4
/// `address`, so the two can split the spellings between them.
fn owns_mapped_form(clash: &RedactionEntry, kind: AddressKind, address: &str) -> bool {
    kind == AddressKind::Ipv4
        && clash.kind == AddressKind::Ipv6
        && ipv4_mapped(&clash.original).as_deref() == Some(address)
}

impl Redactor for RedactionMap {
    fn redact(&self, input: &str) -> String {
        self.apply(input)
    }

    fn name(&self) -> &str {
        "redaction-map"
    }
}
