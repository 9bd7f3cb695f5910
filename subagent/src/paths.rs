//! Fixed directory layout under the subagent root.

use std::path::{Path, PathBuf};

/// Directory name used under `$HOME` when no root is configured.
pub const DEFAULT_ROOT_DIRNAME: &str = ".codex-subagent";

const STATE_DIRNAME: &str = "state";
const LOGS_DIRNAME: &str = "logs";
const STATE_FILENAME: &str = "threads.json";

/// Resolves the well-known locations under a subagent root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubagentPaths {
    root: PathBuf,
}

impl SubagentPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$HOME/.codex-subagent`, or `None` when the home directory is unknown.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_ROOT_DIRNAME))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIRNAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIRNAME)
    }

    /// `<root>/state/threads.json`
    pub fn state_file(&self) -> PathBuf {
        self.state_dir().join(STATE_FILENAME)
    }

    /// Create the root, `state/` and `logs/` if they are missing.
    ///
    /// Idempotent. Never touches the state file itself.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.state_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
