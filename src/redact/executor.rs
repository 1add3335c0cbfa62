use rayon::prelude::*;
use rayon::ThreadPool;

use crate::address::AddressKind;
use crate::config::RedactConfig;
use crate::error::{NetscrubError, Result};
use crate::scan::AddressSet;

use super::{RedactionMap, Redactor};

/// Redact one document with a fixed map.
///
/// Entries are applied in map order against the progressively redacted
/// text, so when two entries could match overlapping text the earlier
/// entry wins.
pub fn apply(map: &RedactionMap, text: &str) -> String {
    map.apply(text)
}

/// Redact many documents on the global rayon pool. Output order matches
/// input order.
pub fn apply_many<R, S>(redactor: &R, texts: &[S]) -> Vec<String>
where
    R: Redactor + ?Sized,
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| redactor.redact(text.as_ref()))
        .collect()
}

/// Scan one document, extend `map` with what it contains, and redact it.
pub fn redact_text(text: &str, map: Option<RedactionMap>) -> (String, RedactionMap) {
    let mut map = map.unwrap_or_default();
    let found = AddressSet::scan(text, &AddressKind::ALL);
    for kind in AddressKind::ALL {
        map.extend(&found.sorted(kind), kind);
    }
    let redacted = map.apply(text);
    (redacted, map)
}

/// Corpus-level driver: parallel discovery, a single map-building step,
/// then parallel substitution.
pub struct Executor {
    pool: ThreadPool,
    kinds: Vec<AddressKind>,
}

impl Executor {
    /// Executor with `workers` threads (0 lets rayon pick) scanning every
    /// address kind.
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_kinds(workers, AddressKind::ALL.to_vec())
    }

    pub fn from_config(config: &RedactConfig) -> Result<Self> {
        Self::with_kinds(config.workers, config.kinds.clone())
    }

    fn with_kinds(workers: usize, mut kinds: Vec<AddressKind>) -> Result<Self> {
        kinds.sort();
        kinds.dedup();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("netscrub-{i}"))
            .build()
            .map_err(|e| NetscrubError::ThreadPool {
                reason: e.to_string(),
            })?;
        Ok(Self { pool, kinds })
    }

    /// Kinds this executor scans for, in map-building order.
    pub fn kinds(&self) -> &[AddressKind] {
        &self.kinds
    }

    /// Union of every address found in `texts`.
    pub fn discover<S>(&self, texts: &[S]) -> AddressSet
    where
        S: AsRef<str> + Sync,
    {
        let kinds = &self.kinds;
        self.pool.install(|| {
            texts
                .par_iter()
                .map(|text| AddressSet::scan(text.as_ref(), kinds))
                .reduce(AddressSet::default, |mut acc, found| {
                    acc.merge(found);
                    acc
                })
        })
    }

    /// Extend `map` with everything in `found`, kind by kind.
    pub fn extend_map(&self, map: &mut RedactionMap, found: &AddressSet) -> usize {
        self.kinds
            .iter()
            .map(|kind| map.extend(&found.sorted(*kind), *kind))
            .sum()
    }

    /// Redact `texts` with `redactor` on this executor's pool.
    pub fn apply_many<R, S>(&self, redactor: &R, texts: &[S]) -> Vec<String>
    where
        R: Redactor + ?Sized,
        S: AsRef<str> + Sync,
    {
        tracing::debug!(
            redactor = redactor.name(),
            documents = texts.len(),
            "applying redactions"
        );
        self.pool.install(|| apply_many(redactor, texts))
    }

    /// Discover, extend `existing` (or a fresh map), and redact every text.
    pub fn redact_corpus<S>(
        &self,
        texts: &[S],
        existing: Option<RedactionMap>,
    ) -> (Vec<String>, RedactionMap)
    where
        S: AsRef<str> + Sync,
    {
        let found = self.discover(texts);
        let mut map = existing.unwrap_or_default();
        let added = self.extend_map(&mut map, &found);
        tracing::info!(
            documents = texts.len(),
            discovered = found.len(),
            added,
            entries = map.len(),
            "redaction map ready"
        );
        let redacted = self.apply_many(&map, texts);
        (redacted, map)
    }
}
