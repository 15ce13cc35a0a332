//! YouTube transcript loader
//!
//! Reads the caption track list embedded in the watch page, picks a track in
//! the preferred languages and decodes its timed-text XML.

use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};
use serde::Deserialize;
use sofia_application::LoadError;
use sofia_domain::{Document, SourceKind};
use std::sync::LazyLock;
use tracing::{debug, info};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

static VIDEO_ID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:v=|youtu\.be/|/shorts/|/embed/|/live/|/v/)([A-Za-z0-9_-]{11})").ok()
});

static BARE_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").ok());

/// Extract the 11-character video id from a URL or a bare id
pub fn video_id(input: &str) -> Result<String, LoadError> {
    let input = input.trim();
    if BARE_ID.as_ref().is_some_and(|re| re.is_match(input)) {
        return Ok(input.to_string());
    }
    VIDEO_ID
        .as_ref()
        .and_then(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| LoadError::InvalidVideo(input.to_string()))
}

/// One entry of the player's `captionTracks` list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated captions
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Parse the caption track list out of a watch page
pub fn parse_caption_tracks(page: &str) -> Vec<CaptionTrack> {
    const KEY: &str = "\"captionTracks\":";
    let Some(start) = page.find(KEY) else {
        return Vec::new();
    };
    let rest = &page[start + KEY.len()..];
    serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .and_then(Result::ok)
        .unwrap_or_default()
}

/// First track in language preference order, manual captions before generated ones
pub fn choose_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let matching = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(lang);
        tracks
            .iter()
            .filter(matching)
            .find(|t| !t.is_generated())
            .or_else(|| tracks.iter().find(matching))
    })
}

/// Decode `<text>` segments of a timed-text document
pub fn parse_timedtext(xml: &str) -> Vec<String> {
    let document = Html::parse_document(xml);
    let Ok(selector) = Selector::parse("text") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| decode_entities(&el.text().collect::<String>()))
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Timed text is escaped twice; the first pass is undone by the parser
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    Html::parse_fragment(text).root_element().text().collect()
}

pub struct YoutubeLoader {
    client: reqwest::Client,
    languages: Vec<String>,
}

impl YoutubeLoader {
    pub fn new(client: reqwest::Client, languages: Vec<String>) -> Self {
        Self { client, languages }
    }

    pub async fn load(&self, location: &str) -> Result<Document, LoadError> {
        let id = video_id(location)?;
        debug!(video_id = %id, "fetching watch page");

        let page = self
            .get_text(&format!("{}{}", WATCH_URL, id))
            .await?;
        let tracks = parse_caption_tracks(&page);
        debug!(video_id = %id, tracks = tracks.len(), "caption tracks found");

        let track = choose_track(&tracks, &self.languages).ok_or_else(|| LoadError::NoTranscript {
            video_id: id.clone(),
            languages: self.languages.join(", "),
        })?;

        let xml = self.get_text(&track.base_url).await?;
        let segments = parse_timedtext(&xml);
        if segments.is_empty() {
            return Err(LoadError::NoTranscript {
                video_id: id,
                languages: track.language_code.clone(),
            });
        }

        info!(video_id = %id, language = %track.language_code, segments = segments.len(), "transcript loaded");
        Ok(Document::new(SourceKind::Youtube, segments.join(" ")))
    }

    async fn get_text(&self, url: &str) -> Result<String, LoadError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, super::user_agent::random_user_agent())
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))
    }
}
