use globset::GlobSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::address::AddressKind;
use crate::error::{NetscrubError, Result};

/// Project redaction configuration, read from `.netscrub.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactConfig {
    /// Worker threads for scanning and substitution. 0 = one per core.
    /// Default: 16.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Address kinds to redact. Default: all.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<AddressKind>,

    /// Globs selecting files when a directory is given. Empty selects
    /// every file.
    #[serde(default)]
    pub include: Vec<String>,

    /// Legacy maps only: MAC surrogates get the locally administered bit.
    #[serde(default)]
    pub local_macs: bool,
}

fn default_workers() -> usize {
    16
}
fn default_kinds() -> Vec<AddressKind> {
    AddressKind::ALL.to_vec()
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            kinds: default_kinds(),
            include: Vec::new(),
            local_macs: false,
        }
    }
}

impl RedactConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| NetscrubError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load config from the project root. Checks `.netscrub.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        Self::load_from(&project_root.join(".netscrub.yml"))
    }

    /// Compile `include` into a matcher, or `None` when it is empty.
    pub fn include_set(&self) -> Result<Option<GlobSet>> {
        if self.include.is_empty() {
            return Ok(None);
        }
        build_globset(&self.include).map(Some)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::Glob::new(pattern).map_err(|e| NetscrubError::GlobPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| NetscrubError::GlobPattern {
        pattern: patterns.join(","),
        reason: e.to_string(),
    })
}
