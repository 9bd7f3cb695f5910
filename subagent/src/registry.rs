//! In-memory thread map backed by a single JSON state file.
//!
//! The file is read once in [`Registry::open`] and rewritten in full on
//! every [`Registry::upsert`]. Load policy:
//!
//! | state file                        | result                      |
//! |-----------------------------------|-----------------------------|
//! | absent                            | empty registry              |
//! | empty / whitespace only           | empty registry              |
//! | unreadable (permissions, UTF-8)   | [`LoadError::Io`]           |
//! | invalid JSON                      | [`LoadError::Malformed`]    |
//! | valid JSON, not an object         | empty registry (warned)     |
//!
//! Entries whose value is not an object are kept verbatim and written back
//! on every persist; they are just never returned as records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::atomic;
use crate::error::{LoadError, PersistError, UpsertError, ValidationError, json_kind};

/// A thread record: an arbitrary JSON object carrying a `thread_id`.
pub type ThreadRecord = serde_json::Map<String, Value>;

/// Field holding a record's identity.
pub const THREAD_ID_FIELD: &str = "thread_id";

/// Durable registry of thread records keyed by `thread_id`.
///
/// Records go in and come out by value, so callers never share state with
/// the registry. Entries are stored as raw JSON so that hand-edited
/// non-object entries survive a rewrite. Mutation needs `&mut self`;
/// hosts that share a registry across threads wrap it in a `Mutex`.
#[derive(Debug)]
pub struct Registry {
    state_file: PathBuf,
    threads: BTreeMap<String, Value>,
}

impl Registry {
    /// Load the registry from `state_file`.
    pub fn open(state_file: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let state_file = state_file.into();
        let threads = load_threads(&state_file)?;
        tracing::debug!(
            path = %state_file.display(),
            threads = threads.len(),
            "registry loaded"
        );
        Ok(Self {
            state_file,
            threads,
        })
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Number of stored entries, including non-object ones.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn contains(&self, thread_id: &str) -> bool {
        self.threads.contains_key(thread_id)
    }

    /// Copies of every record, sorted by `thread_id`.
    pub fn list_threads(&self) -> Vec<ThreadRecord> {
        self.threads
            .values()
            .filter_map(|value| value.as_object().cloned())
            .collect()
    }

    /// Copy of the record stored under `thread_id`, if any.
    pub fn get(&self, thread_id: &str) -> Option<ThreadRecord> {
        self.threads
            .get(thread_id)
            .and_then(|value| value.as_object().cloned())
    }

    /// Insert or fully replace a record, then persist the whole registry.
    /// Returns the key the record is stored under.
    ///
    /// On [`UpsertError::Persist`] the in-memory map already holds the new
    /// record but the file may still hold the previous snapshot.
    pub fn upsert(&mut self, record: ThreadRecord) -> Result<String, UpsertError> {
        let thread_id = thread_id_of(&record)?;
        self.threads.insert(thread_id.clone(), Value::Object(record));
        self.persist()?;
        tracing::debug!(%thread_id, "thread upserted");
        Ok(thread_id)
    }

    /// Like [`Registry::upsert`] for an untyped JSON value.
    pub fn upsert_value(&mut self, value: Value) -> Result<String, UpsertError> {
        match value {
            Value::Object(record) => self.upsert(record),
            other => Err(ValidationError::NotAnObject {
                kind: json_kind(&other),
            }
            .into()),
        }
    }

    fn persist(&self) -> Result<(), PersistError> {
        let json = serde_json::to_vec_pretty(&self.threads)?;
        atomic::write_atomic(&self.state_file, &json)?;
        tracing::debug!(
            path = %self.state_file.display(),
            threads = self.threads.len(),
            "registry persisted"
        );
        Ok(())
    }
}

/// Coerce a record's `thread_id` to its string key.
///
/// Strings are taken as-is; every other value uses its compact JSON
/// rendering (`7` → `"7"`, `true` → `"true"`). Absent, `null`, `""` and
/// empty arrays or objects carry no identity.
pub fn thread_id_of(record: &ThreadRecord) -> Result<String, ValidationError> {
    let id = match record.get(THREAD_ID_FIELD) {
        None | Some(Value::Null) => return Err(ValidationError::MissingThreadId),
        Some(Value::String(id)) => id.clone(),
        Some(Value::Array(items)) if items.is_empty() => {
            return Err(ValidationError::MissingThreadId);
        }
        Some(Value::Object(fields)) if fields.is_empty() => {
            return Err(ValidationError::MissingThreadId);
        }
        Some(other) => other.to_string(),
    };
    if id.is_empty() {
        return Err(ValidationError::MissingThreadId);
    }
    Ok(id)
}

fn load_threads(path: &Path) -> Result<BTreeMap<String, Value>, LoadError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(BTreeMap::new());
    }

    let data: Value = serde_json::from_str(raw).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match data {
        Value::Object(entries) => entries,
        other => {
            tracing::warn!(
                path = %path.display(),
                kind = json_kind(&other),
                "registry state is not a JSON object; starting empty"
            );
            return Ok(BTreeMap::new());
        }
    };

    for (key, value) in &entries {
        match value {
            Value::Object(record) => {
                if !matches!(thread_id_of(record), Ok(ref id) if id == key) {
                    tracing::warn!(
                        path = %path.display(),
                        thread_id = %key,
                        "thread entry has a thread_id that does not match its key"
                    );
                }
            }
            other => tracing::warn!(
                path = %path.display(),
                thread_id = %key,
                kind = json_kind(other),
                "keeping non-object thread entry as-is"
            ),
        }
    }
    Ok(entries.into_iter().collect())
}
