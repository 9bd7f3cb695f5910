//! Crash-safe file replacement.
//!
//! Uses the temp-file + fsync + rename pattern:
//! 1. Write to a fresh temporary file in the destination directory
//! 2. fsync the temporary file
//! 3. Rename (atomic on POSIX) over the destination
//! 4. fsync the directory so the rename itself is durable (best effort)
//!
//! The temporary file is owned by a [`tempfile::NamedTempFile`], which
//! unlinks it on drop. Every early return therefore cleans up after itself.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::PersistError;

/// Atomically replace `path` with `data`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), PersistError> {
    write_atomic_with(path, |file| file.write_all(data))
}

/// Atomically replace `path` with whatever `write` puts into the temp file.
///
/// If `write` fails the destination is left untouched and the temporary
/// file is removed before the error is returned.
pub fn write_atomic_with<F>(path: &Path, write: F) -> Result<(), PersistError>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let dir = parent_dir(path);
    std::fs::create_dir_all(dir).map_err(|source| PersistError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state".to_string());
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| PersistError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let temp_path = temp.path().to_path_buf();
    let temp_io_err = |source| PersistError::Io {
        path: temp_path.clone(),
        source,
    };
    write(temp.as_file_mut()).map_err(temp_io_err)?;
    let file = temp.as_file_mut();
    file.flush().map_err(temp_io_err)?;
    file.sync_all().map_err(temp_io_err)?;

    temp.persist(path).map_err(|err| PersistError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    sync_dir(dir);
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(err) = File::open(dir).and_then(|handle| handle.sync_all()) {
        tracing::debug!(dir = %dir.display(), "directory fsync skipped: {err}");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
