//! Netease Open Course playlist provider implementation.
use super::netease_types::{NeteasePlaylist, NeteaseSubtitle, NeteaseVideo};
use super::{Playlist, PlaylistProvider, PlaylistRetrievalError, Subtitle, Video};
use reqwest::header::USER_AGENT;

/// Browser user agent sent with every request; the API may reject clients
/// without one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:50.0) Gecko/20120101 Firefox/50.0";

/// Playlist provider for the Netease Open Course mobile API.
///
/// This provider fetches playlists from http://mobile.open.163.com using the
/// endpoint the Android app uses, which lists every video together with its
/// subtitle tracks.
pub struct NeteaseProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    user_agent: String,
}

impl NeteaseProvider {
    /// Creates a new provider for the public API.
    pub fn new() -> Self {
        Self::with_base_url("http://mobile.open.163.com")
    }

    /// Creates a provider talking to a different host.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Replaces the user agent sent with each request.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Converts an API subtitle to our internal Subtitle structure.
    fn convert_subtitle(subtitle: NeteaseSubtitle) -> Subtitle {
        Subtitle {
            url: subtitle.sub_url,
            language: subtitle.sub_name,
        }
    }

    /// Converts an API video to our internal Video structure.
    fn convert_video(video: NeteaseVideo) -> Result<Video, PlaylistRetrievalError> {
        let converted = Video {
            number: video.pnumber.to_string(),
            title: video.title,
            origin_url: video.repovideourl_origin.unwrap_or_default(),
            url: video.repovideourl.unwrap_or_default(),
            subtitles: video
                .sub_list
                .unwrap_or_default()
                .into_iter()
                .map(Self::convert_subtitle)
                .collect(),
        };

        if converted.source_url().is_empty() {
            return Err(PlaylistRetrievalError::ParseError(format!(
                "video {} '{}' has no download URL",
                converted.number, converted.title
            )));
        }

        Ok(converted)
    }

    /// Converts the API playlist to our internal Playlist structure.
    fn convert_playlist(playlist: NeteasePlaylist) -> Result<Playlist, PlaylistRetrievalError> {
        let videos = playlist
            .video_list
            .into_iter()
            .map(Self::convert_video)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Playlist {
            title: playlist.title,
            subtitle: playlist.subtitle.unwrap_or_default(),
            videos,
        })
    }

    /// Parses a raw response body into a Playlist.
    pub(crate) fn parse_playlist(body: &str) -> Result<Playlist, PlaylistRetrievalError> {
        let playlist: NeteasePlaylist = serde_json::from_str(body)
            .map_err(|e| PlaylistRetrievalError::ParseError(e.to_string()))?;
        Self::convert_playlist(playlist)
    }
}

impl Default for NeteaseProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistProvider for NeteaseProvider {
    fn playlist_url(&self, plid: &str) -> String {
        format!("{}/movie/{}/getMoviesForAndroid.htm", self.base_url, plid)
    }

    fn fetch_playlist(&self, plid: &str) -> Result<Playlist, PlaylistRetrievalError> {
        let url = self.playlist_url(plid);
        tracing::debug!(%url, "requesting playlist");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(|e| PlaylistRetrievalError::RequestError(e.to_string()))?;

        // Check if the playlist was found
        if response.status() == 404 {
            return Err(PlaylistRetrievalError::PlaylistNotFound(plid.to_string()));
        }

        // Ensure request was successful
        if !response.status().is_success() {
            return Err(PlaylistRetrievalError::RequestError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        // The API does not always label its JSON correctly, so parse the text
        let body = response
            .text()
            .map_err(|e| PlaylistRetrievalError::RequestError(e.to_string()))?;

        Self::parse_playlist(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const PLAYLIST_BODY: &str = r#"{"title": "课程", "subtitle": "", "videoList": []}"#;

    /// Answers a single HTTP request with the given status line and body,
    /// returning the server's base URL and a handle yielding the raw request head
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8(request).unwrap()
        });

        (base_url, handle)
    }

    /// Provider for a local server, bypassing any proxy from the environment
    fn local_provider(base_url: &str) -> NeteaseProvider {
        NeteaseProvider {
            client: reqwest::blocking::Client::builder()
                .no_proxy()
                .build()
                .unwrap(),
            ..NeteaseProvider::with_base_url(base_url)
        }
    }

    fn has_header(request: &str, name: &str, value: &str) -> bool {
        request.lines().any(|line| {
            line.split_once(':').is_some_and(|(n, v)| {
                n.trim().eq_ignore_ascii_case(name) && v.trim() == value
            })
        })
    }

    #[test]
    fn test_fetch_playlist_request() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", PLAYLIST_BODY);

        let playlist = local_provider(&base_url).fetch_playlist("ABC").unwrap();
        let request = server.join().unwrap();

        assert_eq!(playlist.title, "课程");
        assert!(playlist.videos.is_empty());
        assert!(request.starts_with("GET /movie/ABC/getMoviesForAndroid.htm HTTP/1.1\r\n"));
        assert!(has_header(&request, "user-agent", DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_fetch_playlist_custom_user_agent() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", PLAYLIST_BODY);

        local_provider(&base_url)
            .user_agent("course-fetcher/1.0")
            .fetch_playlist("ABC")
            .unwrap();
        let request = server.join().unwrap();

        assert!(has_header(&request, "user-agent", "course-fetcher/1.0"));
    }

    #[test]
    fn test_fetch_playlist_not_found() {
        let (base_url, server) = serve_once("HTTP/1.1 404 Not Found", "");

        let result = local_provider(&base_url).fetch_playlist("X");
        server.join().unwrap();

        assert!(matches!(
            result,
            Err(PlaylistRetrievalError::PlaylistNotFound(plid)) if plid == "X"
        ));
    }

    #[test]
    fn test_fetch_playlist_server_error() {
        let (base_url, server) = serve_once("HTTP/1.1 500 Internal Server Error", "oops");

        let result = local_provider(&base_url).fetch_playlist("X");
        server.join().unwrap();

        assert!(matches!(
            result,
            Err(PlaylistRetrievalError::RequestError(message))
                if message == "HTTP 500 Internal Server Error"
        ));
    }

    #[test]
    fn test_fetch_playlist_invalid_body() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "<html>maintenance</html>");

        let result = local_provider(&base_url).fetch_playlist("X");
        server.join().unwrap();

        assert!(matches!(result, Err(PlaylistRetrievalError::ParseError(_))));
    }

    #[test]
    fn test_playlist_url() {
        let provider = NeteaseProvider::new();
        assert_eq!(
            provider.playlist_url("M6HV755O6"),
            "http://mobile.open.163.com/movie/M6HV755O6/getMoviesForAndroid.htm"
        );

        let provider = NeteaseProvider::with_base_url("http://localhost:8080/");
        assert_eq!(
            provider.playlist_url("ABCDE"),
            "http://localhost:8080/movie/ABCDE/getMoviesForAndroid.htm"
        );
    }

    #[test]
    fn test_parse_playlist() {
        let body = r#"{
            "title": "课程",
            "subtitle": "",
            "videoList": [
                {
                    "pnumber": 1,
                    "title": "Intro",
                    "repovideourlOrigin": "",
                    "repovideourl": "http://x/a.mp4",
                    "subList": [{"subUrl": "http://x/a.srt", "subName": "英文"}]
                },
                {
                    "pnumber": "12",
                    "title": "Outro",
                    "repovideourlOrigin": "http://x/b.flv",
                    "repovideourl": "http://x/b.mp4",
                    "subList": null
                }
            ]
        }"#;

        let playlist = NeteaseProvider::parse_playlist(body).unwrap();
        assert_eq!(playlist.title, "课程");
        assert_eq!(playlist.subtitle, "");
        assert_eq!(playlist.videos.len(), 2);

        let first = &playlist.videos[0];
        assert_eq!(first.number, "1");
        assert_eq!(first.source_url(), "http://x/a.mp4");
        assert_eq!(
            first.subtitles,
            vec![Subtitle {
                url: "http://x/a.srt".to_string(),
                language: "英文".to_string(),
            }]
        );

        let second = &playlist.videos[1];
        assert_eq!(second.number, "12");
        assert_eq!(second.source_url(), "http://x/b.flv");
        assert!(second.subtitles.is_empty());
    }

    #[test]
    fn test_parse_float_episode_number() {
        let body = r#"{
            "title": "课程",
            "videoList": [{"pnumber": 3.0, "title": "Intro", "repovideourl": "http://x/a.mp4"}]
        }"#;
        let playlist = NeteaseProvider::parse_playlist(body).unwrap();
        assert_eq!(playlist.videos[0].number, "3.0");
    }

    #[test]
    fn test_parse_null_subtitle() {
        let body = r#"{"title": "课程", "subtitle": null, "videoList": []}"#;
        let playlist = NeteaseProvider::parse_playlist(body).unwrap();
        assert_eq!(playlist.subtitle, "");
        assert!(playlist.videos.is_empty());
    }

    #[test]
    fn test_parse_missing_fields() {
        let result = NeteaseProvider::parse_playlist(r#"{"subtitle": "x", "videoList": []}"#);
        assert!(matches!(result, Err(PlaylistRetrievalError::ParseError(_))));

        let result = NeteaseProvider::parse_playlist("<html>not json</html>");
        assert!(matches!(result, Err(PlaylistRetrievalError::ParseError(_))));
    }

    #[test]
    fn test_parse_video_without_url() {
        let body = r#"{
            "title": "课程",
            "videoList": [{"pnumber": 1, "title": "Intro", "repovideourlOrigin": ""}]
        }"#;
        let result = NeteaseProvider::parse_playlist(body);
        assert!(matches!(result, Err(PlaylistRetrievalError::ParseError(_))));
    }
}
