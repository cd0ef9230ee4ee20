//! Download directive resolution
//!
//! This module turns a fetched playlist into the flat, ordered list of
//! downloads that make up one aria2 input file.

use crate::playlist_retrieval::{Playlist, Subtitle, Video};
use std::path::Path;

/// Filename the raw playlist metadata is saved under
pub const PLAYLIST_FILENAME: &str = "playlist.json";

/// A single download job: where to fetch from and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDirective {
    /// Source URL
    pub url: String,
    /// Target directory
    pub directory: String,
    /// Target filename within the directory
    pub filename: String,
}

impl DownloadDirective {
    fn new(url: &str, directory: &str, filename: String) -> Self {
        Self {
            url: url.to_string(),
            directory: directory.to_string(),
            filename,
        }
    }
}

/// The resolved downloads of one playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaylist {
    /// `{plid}.{display title}`, also the name of the output file
    pub directory_name: String,
    /// Downloads in output order
    pub directives: Vec<DownloadDirective>,
}

/// Zero-pads an episode number to at least two characters
pub fn episode_label(number: &str) -> String {
    format!("{:0>2}", number)
}

/// Maps the API's subtitle language label to a short language code
///
/// Unknown labels are used as they are.
pub fn language_code(label: &str) -> &str {
    match label {
        "英文" => "en",
        "中文" => "zh-cn",
        other => other,
    }
}

/// Returns everything after the last `.` of a URL, or the whole URL if it
/// contains no dot
pub fn url_extension(url: &str) -> &str {
    url.rsplit_once('.').map_or(url, |(_, extension)| extension)
}

fn video_directive(video: &Video, episode: &str, directory: &str) -> DownloadDirective {
    let url = video.source_url();
    let filename = format!("{}.{}.{}", episode, video.title.trim(), url_extension(url));
    DownloadDirective::new(url, directory, filename)
}

fn subtitle_directive(subtitle: &Subtitle, episode: &str, directory: &str) -> DownloadDirective {
    let filename = format!("{}.{}.srt", episode, language_code(&subtitle.language));
    DownloadDirective::new(&subtitle.url, directory, filename)
}

/// Resolves a playlist into its ordered download directives
///
/// The first directive saves the playlist metadata itself. Every video is
/// followed directly by its subtitles, all in API order.
///
/// # Arguments
///
/// * `plid` - The playlist identifier
/// * `playlist_url` - URL the playlist metadata was fetched from
/// * `playlist` - The fetched playlist
/// * `download_dir` - Optional base directory the playlist directory is placed in
pub fn resolve_directives(
    plid: &str,
    playlist_url: &str,
    playlist: &Playlist,
    download_dir: Option<&Path>,
) -> ResolvedPlaylist {
    let directory_name = format!("{}.{}", plid, playlist.display_title())
        .trim()
        .to_string();
    let directory = match download_dir {
        Some(base) => base.join(&directory_name).to_string_lossy().into_owned(),
        None => directory_name.clone(),
    };

    let mut directives = vec![DownloadDirective::new(
        playlist_url,
        &directory,
        PLAYLIST_FILENAME.to_string(),
    )];

    for video in &playlist.videos {
        let episode = episode_label(&video.number);
        directives.push(video_directive(video, &episode, &directory));
        directives.extend(
            video
                .subtitles
                .iter()
                .map(|subtitle| subtitle_directive(subtitle, &episode, &directory)),
        );
    }

    ResolvedPlaylist {
        directory_name,
        directives,
    }
}
