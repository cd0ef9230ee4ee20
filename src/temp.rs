//! Temporary file management module
//!
//! This module provides RAII-based temporary file handling: output is written
//! to a temporary file next to its destination and only moved into place once
//! complete.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Guard for a temporary file that is deleted on drop unless persisted
#[derive(Debug)]
pub(crate) struct TempGuard {
    path: PathBuf,
    persisted: bool,
}

impl TempGuard {
    /// Get the path to the temporary file
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Moves the temporary file to `destination`, replacing any existing file
    pub(crate) fn persist(mut self, destination: &Path) -> io::Result<()> {
        fs::rename(&self.path, destination)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.persisted {
            // Silently ignore errors during cleanup
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Creates a temporary file in `dir` and returns a guard that will clean it
/// up on drop
///
/// The file name is unique thanks to a ULID (monotonic, sortable unique
/// identifier). Creating it in the destination directory keeps the final
/// rename on one filesystem.
///
/// # Examples
///
/// ```ignore
/// let temp = create_temp_file(Path::new("."), "playlist")?;
/// fs::write(temp.path(), contents)?;
/// temp.persist(Path::new("playlist.aria2"))?;
/// ```
pub(crate) fn create_temp_file(dir: &Path, prefix: &str) -> io::Result<TempGuard> {
    let ulid = ulid::Ulid::new();
    let path = dir.join(format!(".{}_{}.tmp", prefix, ulid));

    File::create(&path)?;

    Ok(TempGuard {
        path,
        persisted: false,
    })
}
