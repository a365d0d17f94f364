use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::MusicBrainzConfig;
use crate::error::LookupError;
use crate::models::{PartialDate, RecordingMatch, ReleaseCandidate};
use crate::sources::RecordingCatalog;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// MusicBrainz 녹음(recording) 검색 클라이언트.
pub struct MusicBrainzClient {
    client: reqwest::blocking::Client,
    base_url: String,
    search_limit: Option<u32>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    recordings: Vec<MbRecording>,
}

#[derive(Deserialize)]
struct MbRecording {
    #[serde(default)]
    score: Score,
    #[serde(default)]
    title: String,
    #[serde(default)]
    releases: Option<Vec<MbRelease>>,
}

#[derive(Deserialize)]
struct MbRelease {
    #[serde(default)]
    title: String,
    date: Option<String>,
}

/// 예전 응답은 score를 문자열로 준다.
#[derive(Deserialize)]
#[serde(untagged)]
enum Score {
    Number(u32),
    Text(String),
}

impl Default for Score {
    fn default() -> Self {
        Score::Number(0)
    }
}

impl Score {
    fn value(&self) -> u8 {
        let raw = match self {
            Score::Number(n) => *n,
            Score::Text(s) => s.trim().parse().unwrap_or(0),
        };
        raw.min(100) as u8
    }
}

impl MusicBrainzClient {
    pub fn new(config: &MusicBrainzConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("MusicBrainz HTTP client could not be created")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
        })
    }

    fn parse_response(body: &str) -> Result<Vec<RecordingMatch>, LookupError> {
        let resp: SearchResponse = serde_json::from_str(body)?;
        Ok(resp.recordings.into_iter().map(Self::convert_recording).collect())
    }

    fn convert_recording(recording: MbRecording) -> RecordingMatch {
        let releases = recording
            .releases
            .unwrap_or_default()
            .into_iter()
            .map(|release| ReleaseCandidate {
                title: release.title,
                date: release.date.as_deref().and_then(PartialDate::parse),
            })
            .collect();

        RecordingMatch {
            score: recording.score.value(),
            title: recording.title,
            releases,
        }
    }
}

impl RecordingCatalog for MusicBrainzClient {
    fn name(&self) -> &str {
        "MusicBrainz"
    }

    fn find_recordings(&self, query: &str) -> Result<Vec<RecordingMatch>, LookupError> {
        let url = format!("{}/recording", self.base_url);
        let limit = self.search_limit.map(|n| n.to_string());
        let mut params = vec![("query", query), ("fmt", "json")];
        if let Some(ref limit) = limit {
            params.push(("limit", limit.as_str()));
        }

        tracing::debug!(url = %url, query = %query, "searching MusicBrainz recordings");

        let resp = self.client.get(&url).query(&params).send()?;
        let status = resp.status();
        let body = resp.text()?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let recordings = Self::parse_response(&body)?;
        tracing::debug!(count = recordings.len(), "MusicBrainz search returned");
        Ok(recordings)
    }
}
