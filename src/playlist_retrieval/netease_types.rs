//! Netease Open Course API response types for deserialization.
//!
//! These structures mirror the JSON response format of the
//! `getMoviesForAndroid.htm` endpoint.
use serde::Deserialize;
use std::fmt;

/// The top-level playlist object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NeteasePlaylist {
    /// Chinese course title
    pub title: String,
    /// English course title (may be null or empty)
    #[serde(default)]
    pub subtitle: Option<String>,
    pub video_list: Vec<NeteaseVideo>,
}

/// A single video entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NeteaseVideo {
    pub pnumber: EpisodeNumber,
    pub title: String,
    /// Original upload without preamble (may be null or empty)
    #[serde(default, rename = "repovideourlOrigin")]
    pub repovideourl_origin: Option<String>,
    #[serde(default)]
    pub repovideourl: Option<String>,
    #[serde(default)]
    pub sub_list: Option<Vec<NeteaseSubtitle>>,
}

/// A subtitle track of a video.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NeteaseSubtitle {
    pub sub_url: String,
    pub sub_name: String,
}

/// The API is not consistent about whether `pnumber` is a number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum EpisodeNumber {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeNumber::Number(n) => write!(f, "{}", n),
            EpisodeNumber::Text(s) => f.write_str(s.trim()),
        }
    }
}
