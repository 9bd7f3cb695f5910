//! Error taxonomy for the thread registry.

use std::path::PathBuf;

/// The state file exists but cannot be read safely.
///
/// Fatal to [`crate::Registry::open`]: surfacing it keeps a corrupted
/// registry visible to the operator instead of silently starting empty.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Open/read failure, including invalid UTF-8.
    #[error("registry unreadable at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("registry unreadable at {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Malformed { path, .. } => path,
        }
    }
}

/// A record handed to `upsert` has no usable identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("thread must include a non-empty thread_id")]
    MissingThreadId,

    #[error("thread must be a JSON object, found {kind}")]
    NotAnObject { kind: &'static str },
}

/// Failure anywhere in the atomic write sequence.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to persist registry to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from [`crate::Registry::upsert`].
#[derive(Debug, thiserror::Error)]
pub enum UpsertError {
    /// Rejected before any state changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The in-memory map already holds the new record; durability is unknown.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Human-readable JSON type name used in validation messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
