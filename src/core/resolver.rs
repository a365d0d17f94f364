use chrono::{Datelike, NaiveDate};

use crate::error::LookupError;
use crate::report::{self, Reporter};
use crate::sources::RecordingCatalog;

/// 이 점수 미만의 녹음은 같은 곡으로 보지 않는다.
pub const MIN_SCORE: u8 = 70;

/// 1877년 이전에는 녹음 기술이 없었으므로 그보다 이른 날짜는 무시한다.
pub fn oldest_allowed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1877, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// 곡의 가장 이른 발매일을 조회한다.
pub struct ReleaseDateResolver<'a> {
    catalog: &'a dyn RecordingCatalog,
    reporter: &'a dyn Reporter,
}

impl<'a> ReleaseDateResolver<'a> {
    pub fn new(catalog: &'a dyn RecordingCatalog, reporter: &'a dyn Reporter) -> Self {
        Self { catalog, reporter }
    }

    /// `Ok(None)`은 조회는 됐지만 조건에 맞는 후보가 없다는 뜻이다.
    pub fn oldest_release_year(&self, artist: &str, title: &str) -> Result<Option<i32>, LookupError> {
        Ok(self.oldest_release_date(artist, title)?.map(|date| date.year()))
    }

    /// 카탈로그에 한 번만 질의하고, 점수가 [`MIN_SCORE`] 이상인 녹음의
    /// 발매일 중 가장 이른 날짜를 고른다.
    pub fn oldest_release_date(&self, artist: &str, title: &str) -> Result<Option<NaiveDate>, LookupError> {
        let query = build_query(artist, title);

        report::info(self.reporter, report::LOOKUP, || {
            format!("    Looking up on {}...", self.catalog.name())
        });
        let recordings = self.catalog.find_recordings(&query)?;
        report::info(self.reporter, report::TRACE, || {
            format!("    Found {} recording results.", recordings.len())
        });

        let floor = oldest_allowed_date();
        let mut oldest: Option<NaiveDate> = None;
        for recording in recordings.iter().filter(|r| r.score >= MIN_SCORE) {
            for release in &recording.releases {
                let Some(partial) = release.date else {
                    continue;
                };
                let Some(date) = partial.nearest_date().filter(|d| *d >= floor) else {
                    continue;
                };
                tracing::trace!(
                    recording = %recording.title,
                    release = %release.title,
                    date = %partial,
                    score = recording.score,
                    "candidate release"
                );
                if oldest.map_or(true, |current| date < current) {
                    oldest = Some(date);
                }
            }
        }

        tracing::debug!(query = %query, oldest = ?oldest, "resolved oldest release date");
        Ok(oldest)
    }
}

/// 따옴표와 NUL은 질의 문자열을 깨뜨리므로 제거한다.
pub fn sanitize(value: &str) -> String {
    value.chars().filter(|&c| c != '\0' && c != '"').collect()
}

/// 아티스트와 녹음 제목으로 Lucene 형식 질의를 만든다.
pub fn build_query(artist: &str, title: &str) -> String {
    format!(
        "artist:\"{}\" AND recording:\"{}\"",
        sanitize(artist),
        sanitize(title)
    )
}
