//! Data structures and traits for course playlist retrieval.
//!
//! This module provides structures to represent a course playlist with its
//! videos and subtitle tracks, as well as the trait implemented by playlist
//! providers.

mod netease;
mod netease_types;

pub use netease::{DEFAULT_USER_AGENT, NeteaseProvider};

use thiserror::Error;

/// Errors that can occur during playlist retrieval operations.
#[derive(Debug, Error)]
pub enum PlaylistRetrievalError {
    /// Request to the course API failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the API's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested playlist was not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),
}

/// A subtitle track attached to a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    /// Download URL of the subtitle file
    pub url: String,
    /// Language label as delivered by the API (e.g. "英文")
    pub language: String,
}

/// A single lecture video of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    /// Episode ordering number, unpadded
    pub number: String,
    /// The video title
    pub title: String,
    /// URL of the original upload (without preamble), may be empty
    pub origin_url: String,
    /// URL of the re-encoded upload
    pub url: String,
    /// Subtitle tracks in API order
    pub subtitles: Vec<Subtitle>,
}

impl Video {
    /// Returns the URL the video should be downloaded from.
    ///
    /// The original upload is preferred; the re-encoded one is only used if
    /// no original is available.
    pub fn source_url(&self) -> &str {
        if self.origin_url.is_empty() {
            &self.url
        } else {
            &self.origin_url
        }
    }
}

/// A course playlist with all its videos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Native-language title
    pub title: String,
    /// English title, empty if the course has none
    pub subtitle: String,
    /// Videos in API order
    pub videos: Vec<Video>,
}

impl Playlist {
    /// The title used for naming: the English subtitle if present, the
    /// native title otherwise.
    pub fn display_title(&self) -> &str {
        match self.subtitle.trim() {
            "" => self.title.trim(),
            subtitle => subtitle,
        }
    }
}

/// Trait for providers that can fetch course playlists.
pub trait PlaylistProvider {
    /// Returns the URL the raw playlist metadata is served from.
    fn playlist_url(&self, plid: &str) -> String;

    /// Fetches a playlist.
    ///
    /// # Arguments
    ///
    /// * `plid` - The playlist identifier used by the remote API
    ///
    /// # Returns
    ///
    /// A Result containing the Playlist, or a PlaylistRetrievalError
    fn fetch_playlist(&self, plid: &str) -> Result<Playlist, PlaylistRetrievalError>;
}
