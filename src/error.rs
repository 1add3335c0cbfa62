use std::path::PathBuf;

use crate::address::AddressKind;

#[derive(Debug, thiserror::Error)]
pub enum NetscrubError {
    #[error("invalid {kind} address {value:?}: {reason}")]
    InvalidFormat {
        kind: AddressKind,
        value: String,
        reason: String,
    },

    #[error("pattern error: {pattern}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("invalid redaction map: {reason}")]
    MapFormat { reason: String },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("glob pattern error: {pattern}: {reason}")]
    GlobPattern { pattern: String, reason: String },

    #[error("thread pool error: {reason}")]
    ThreadPool { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetscrubError {
    pub(crate) fn invalid(kind: AddressKind, value: &str, reason: impl Into<String>) -> Self {
        NetscrubError::InvalidFormat {
            kind,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetscrubError>;
