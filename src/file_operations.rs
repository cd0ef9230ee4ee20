use crate::temp::create_temp_file;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of generated aria2 input files
pub const ARIA2_EXTENSION: &str = "aria2";

/// Errors that can occur during file operations
#[derive(Debug, Error)]
pub enum FileOperationError {
    /// Failed to create the output directory
    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to write the output file
    #[error("Failed to write {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

/// Makes a name usable as a single path component
///
/// Only path separators and NUL are replaced (with `-`); everything else,
/// including `:`, `?` and trailing dots, is kept as it is.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\0' => '-',
            c if std::path::is_separator(c) => '-',
            c => c,
        })
        .collect()
}

/// Returns the path of the aria2 input file for a playlist directory name
pub fn aria2_path(output_dir: &Path, directory_name: &str) -> PathBuf {
    output_dir.join(format!(
        "{}.{}",
        sanitize_filename(directory_name),
        ARIA2_EXTENSION
    ))
}

/// Writes an aria2 input file, replacing any existing file of the same name
///
/// Creates the output directory if it doesn't exist. The contents are written
/// to a temporary file first, so a failed write never leaves a truncated file
/// behind.
///
/// # Returns
///
/// The path of the written file
pub fn write_aria2_file(
    output_dir: &Path,
    directory_name: &str,
    contents: &str,
) -> Result<PathBuf, FileOperationError> {
    fs::create_dir_all(output_dir).map_err(|e| FileOperationError::DirectoryCreationFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let path = aria2_path(output_dir, directory_name);
    let write_failed = |source| FileOperationError::WriteFailed {
        path: path.clone(),
        source,
    };

    let temp = create_temp_file(output_dir, ARIA2_EXTENSION).map_err(write_failed)?;
    fs::write(temp.path(), contents).map_err(write_failed)?;
    temp.persist(&path).map_err(write_failed)?;

    Ok(path)
}
