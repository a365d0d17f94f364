use std::fmt;

use chrono::NaiveDate;

/// 두 태그 버전을 병합해 얻은 (아티스트, 제목, 연도) 값.
/// 파일 하나를 처리하는 동안에만 존재하며 저장되지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTag {
    pub artist: String,
    pub title: String,
    pub year: String,
}

impl CanonicalTag {
    pub fn has_artist_and_title(&self) -> bool {
        !self.artist.trim().is_empty() && !self.title.trim().is_empty()
    }

    pub fn summary(&self) -> String {
        format!("\"{}\" \"{}\" ({})", self.artist, self.title, self.year)
    }
}

/// 카탈로그가 돌려주는 날짜. 연도만 있거나 월까지만 있는 경우가 많다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PartialDate {
    /// "YYYY", "YYYY-MM", "YYYY-MM-DD" 형식을 파싱한다.
    /// 빈 문자열이나 연도를 읽을 수 없으면 None.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next()?.trim().parse().ok()?;
        let month = parts.next().and_then(|m| m.trim().parse().ok());
        let day = month.and(parts.next().and_then(|d| d.trim().parse().ok()));
        Some(Self { year, month, day })
    }

    /// 빠진 단위를 첫째 날(1월, 1일)로 채운 가장 가까운 날짜.
    pub fn nearest_date(&self) -> Option<NaiveDate> {
        let month = self.month.unwrap_or(1);
        let day = self.day.unwrap_or(1);
        NaiveDate::from_ymd_opt(self.year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(self.year, month, 1))
            .or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1))
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

/// 녹음 하나에 대한 검색 결과. score는 0-100 관련도.
#[derive(Debug, Clone, Default)]
pub struct RecordingMatch {
    pub score: u8,
    pub title: String,
    pub releases: Vec<ReleaseCandidate>,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseCandidate {
    pub title: String,
    pub date: Option<PartialDate>,
}

/// 파일 하나를 처리한 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    NoTags,
    MissingArtistOrTitle,
    LookupFailed,
    Unresolved,
    AlreadyCorrect,
    Updated { year: i32 },
    WouldUpdate { year: i32 },
}

/// 실행 전체의 결과 집계.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub updated: usize,
    pub already_correct: usize,
    pub unresolved: usize,
    pub lookup_failed: usize,
    pub missing_fields: usize,
    pub no_tags: usize,
    pub flag_files_created: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.processed += 1;
        match outcome {
            FileOutcome::NoTags => self.no_tags += 1,
            FileOutcome::MissingArtistOrTitle => self.missing_fields += 1,
            FileOutcome::LookupFailed => self.lookup_failed += 1,
            FileOutcome::Unresolved => self.unresolved += 1,
            FileOutcome::AlreadyCorrect => self.already_correct += 1,
            FileOutcome::Updated { .. } | FileOutcome::WouldUpdate { .. } => self.updated += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_date_year_only() {
        let date = PartialDate::parse("1965").unwrap();
        assert_eq!(date.month, None);
        assert_eq!(date.nearest_date(), NaiveDate::from_ymd_opt(1965, 1, 1));
    }

    #[test]
    fn test_partial_date_year_month() {
        let date = PartialDate::parse("1965-08").unwrap();
        assert_eq!(date.nearest_date(), NaiveDate::from_ymd_opt(1965, 8, 1));
    }

    #[test]
    fn test_partial_date_full() {
        let date = PartialDate::parse("1965-08-06").unwrap();
        assert_eq!(date.nearest_date(), NaiveDate::from_ymd_opt(1965, 8, 6));
        assert_eq!(date.to_string(), "1965-08-06");
    }

    #[test]
    fn test_partial_date_empty() {
        assert!(PartialDate::parse("").is_none());
        assert!(PartialDate::parse("unknown").is_none());
    }

    #[test]
    fn test_canonical_tag_requires_artist_and_title() {
        let tag = CanonicalTag {
            artist: "The Beatles".to_string(),
            title: " ".to_string(),
            year: "1965".to_string(),
        };
        assert!(!tag.has_artist_and_title());
    }

    #[test]
    fn test_run_stats_record() {
        let mut stats = RunStats::default();
        stats.record(&FileOutcome::Updated { year: 1965 });
        stats.record(&FileOutcome::Unresolved);
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.unresolved, 1);
    }
}
