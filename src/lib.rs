//! open_course_aria2 - Download whole Netease Open Course playlists with aria2
//!
//! This library fetches course playlists, resolves every video and subtitle
//! into a download directive, and writes them as aria2 input files.

mod aria2;
mod directives;
mod file_operations;
mod playlist_retrieval;
mod temp;

// Re-export error types
pub use file_operations::FileOperationError;
pub use playlist_retrieval::PlaylistRetrievalError;

pub use aria2::render_aria2;
pub use directives::{
    DownloadDirective, PLAYLIST_FILENAME, ResolvedPlaylist, episode_label, language_code,
    resolve_directives, url_extension,
};
pub use file_operations::{aria2_path, sanitize_filename, write_aria2_file};
pub use playlist_retrieval::{
    DEFAULT_USER_AGENT, NeteaseProvider, Playlist, PlaylistProvider, Subtitle, Video,
};

use std::path::PathBuf;
use thiserror::Error;

/// Where and how playlists are converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Directory the aria2 input files are written to
    pub output_dir: PathBuf,
    /// Base directory prefixed onto every download directory, if any
    pub download_dir: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            download_dir: None,
        }
    }
}

/// Progress event emitted while converting a playlist
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Fetching the playlist metadata
    Fetching { plid: String },

    /// Playlist fetched and resolved into directives
    Resolved {
        directory_name: String,
        video_count: usize,
        directive_count: usize,
    },

    /// aria2 input file written
    Written { path: PathBuf },

    /// Conversion of this playlist is complete
    Complete { directory_name: String },

    /// Conversion of this playlist failed
    Failed { plid: String, error: String },
}

/// Summary of a converted playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// The playlist identifier
    pub plid: String,
    /// `{plid}.{display title}`
    pub directory_name: String,
    /// Path of the written aria2 input file
    pub output_path: PathBuf,
    /// Number of download directives in the file
    pub directive_count: usize,
}

/// Outcome of converting several playlists
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Successfully converted playlists, in input order
    pub converted: Vec<ConversionResult>,
    /// Playlists that failed, with their errors, in input order
    pub failed: Vec<(String, OpenCourseError)>,
}

impl BatchSummary {
    /// Returns true if no playlist failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Top-level error type for playlist conversion
#[derive(Debug, Error)]
pub enum OpenCourseError {
    /// Error while fetching the playlist
    #[error("Playlist retrieval error: {0}")]
    PlaylistRetrieval(#[from] PlaylistRetrievalError),

    /// Error while writing the aria2 input file
    #[error("File operation error: {0}")]
    FileOperation(#[from] FileOperationError),
}

/// Converts a single playlist into an aria2 input file
///
/// Fetches the playlist through `provider`, resolves it into download
/// directives, and writes `{plid}.{display title}.aria2` into the configured
/// output directory, replacing any previous file of that name.
///
/// Progress events are emitted through the provided callback.
///
/// # Examples
///
/// ```no_run
/// use open_course_aria2::{convert_playlist, ConvertOptions, NeteaseProvider};
///
/// let provider = NeteaseProvider::new();
/// let result = convert_playlist(&provider, "M6HV755O6", &ConvertOptions::default(), |_| {})
///     .unwrap();
/// println!("Wrote {}", result.output_path.display());
/// ```
pub fn convert_playlist<P, F>(
    provider: &P,
    plid: &str,
    options: &ConvertOptions,
    mut progress_callback: F,
) -> Result<ConversionResult, OpenCourseError>
where
    P: PlaylistProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::Fetching {
        plid: plid.to_string(),
    });

    let playlist = provider.fetch_playlist(plid)?;
    let resolved = resolve_directives(
        plid,
        &provider.playlist_url(plid),
        &playlist,
        options.download_dir.as_deref(),
    );

    progress_callback(ProgressEvent::Resolved {
        directory_name: resolved.directory_name.clone(),
        video_count: playlist.videos.len(),
        directive_count: resolved.directives.len(),
    });

    let contents = render_aria2(&resolved.directives);
    let output_path = write_aria2_file(&options.output_dir, &resolved.directory_name, &contents)?;

    progress_callback(ProgressEvent::Written {
        path: output_path.clone(),
    });
    progress_callback(ProgressEvent::Complete {
        directory_name: resolved.directory_name.clone(),
    });

    Ok(ConversionResult {
        plid: plid.to_string(),
        directory_name: resolved.directory_name,
        output_path,
        directive_count: resolved.directives.len(),
    })
}

/// Converts several playlists one after another
///
/// Without `keep_going` the first failing playlist aborts the batch and its
/// error is returned; playlists after it are not touched. With `keep_going`
/// failures are collected in the summary and the remaining playlists are
/// still converted. Every failure is reported as a `ProgressEvent::Failed`.
pub fn convert_playlists<P, S, F>(
    provider: &P,
    plids: &[S],
    options: &ConvertOptions,
    keep_going: bool,
    mut progress_callback: F,
) -> Result<BatchSummary, OpenCourseError>
where
    P: PlaylistProvider + ?Sized,
    S: AsRef<str>,
    F: FnMut(ProgressEvent),
{
    let mut summary = BatchSummary::default();

    for plid in plids {
        let plid = plid.as_ref();
        match convert_playlist(provider, plid, options, &mut progress_callback) {
            Ok(result) => summary.converted.push(result),
            Err(e) => {
                progress_callback(ProgressEvent::Failed {
                    plid: plid.to_string(),
                    error: e.to_string(),
                });
                if !keep_going {
                    return Err(e);
                }
                summary.failed.push((plid.to_string(), e));
            }
        }
    }

    Ok(summary)
}
