//! `codex-subagent` — durable registry of subagent threads.
//!
//! Thread records are JSON objects keyed by their `thread_id` and kept in a
//! single state file under the subagent root:
//!
//! ```text
//! <root>/
//!   state/threads.json    { "<thread_id>": { "thread_id": "...", ... }, ... }
//!   logs/                 reserved for process logs
//! ```
//!
//! Every mutation rewrites the whole state file with the temp-file + fsync +
//! rename pattern, so a reader never observes a partially written file.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod atomic;
pub mod error;
pub mod paths;
pub mod registry;

pub use error::{LoadError, PersistError, UpsertError, ValidationError};
pub use paths::SubagentPaths;
pub use registry::{Registry, ThreadRecord};

/// Environment variable overriding the default subagent root.
pub const ROOT_ENV_VAR: &str = "CODEX_SUBAGENT_ROOT";
