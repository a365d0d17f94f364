use id3::{TagLike, Version};

use crate::core::id3v1::Id3v1Tag;

const YEAR_FRAME: &str = "TYER";
const RECORDING_TIME_FRAME: &str = "TDRC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagVersion {
    Id3v1,
    Id3v2,
}

impl TagVersion {
    pub fn label(self) -> &'static str {
        match self {
            TagVersion::Id3v1 => "ID3v1",
            TagVersion::Id3v2 => "ID3v2",
        }
    }
}

/// 두 태그 버전에 공통인 아티스트/제목/연도 접근.
///
/// 읽을 때는 앞뒤 공백, 줄바꿈, NUL을 제거하고 없는 필드는 빈 문자열로 본다.
/// 쓸 때는 값을 그대로 기록한다.
#[derive(Debug, Clone)]
pub enum TagView {
    V1(Id3v1Tag),
    V2(id3::Tag),
}

impl TagView {
    pub fn version(&self) -> TagVersion {
        match self {
            TagView::V1(_) => TagVersion::Id3v1,
            TagView::V2(_) => TagVersion::Id3v2,
        }
    }

    pub fn artist(&self) -> String {
        match self {
            TagView::V1(tag) => normalize(&tag.artist),
            TagView::V2(tag) => normalize(tag.artist().unwrap_or_default()),
        }
    }

    pub fn title(&self) -> String {
        match self {
            TagView::V1(tag) => normalize(&tag.title),
            TagView::V2(tag) => normalize(tag.title().unwrap_or_default()),
        }
    }

    pub fn year(&self) -> String {
        match self {
            TagView::V1(tag) => normalize(&tag.year),
            TagView::V2(tag) => {
                if let Some(year) = frame_text(tag, YEAR_FRAME) {
                    return normalize(year);
                }
                // TDRC는 전체 타임스탬프. 연도 부분만 쓴다
                frame_text(tag, RECORDING_TIME_FRAME)
                    .map(|ts| normalize(normalize(ts).split('-').next().unwrap_or_default()))
                    .unwrap_or_default()
            }
        }
    }

    #[allow(dead_code)]
    pub fn set_artist(&mut self, artist: &str) {
        match self {
            TagView::V1(tag) => tag.artist = artist.to_string(),
            TagView::V2(tag) => tag.set_artist(artist),
        }
    }

    #[allow(dead_code)]
    pub fn set_title(&mut self, title: &str) {
        match self {
            TagView::V1(tag) => tag.title = title.to_string(),
            TagView::V2(tag) => tag.set_title(title),
        }
    }

    /// 태그에 있는 연도 프레임마다 기록한다.
    /// 하나도 없으면 태그 버전에 맞는 프레임을 만든다.
    pub fn set_year(&mut self, year: &str) {
        match self {
            TagView::V1(tag) => tag.year = year.to_string(),
            TagView::V2(tag) => {
                let mut ids: Vec<&str> = [YEAR_FRAME, RECORDING_TIME_FRAME]
                    .into_iter()
                    .filter(|id| tag.get(*id).is_some())
                    .collect();
                if ids.is_empty() {
                    ids.push(match tag.version() {
                        Version::Id3v24 => RECORDING_TIME_FRAME,
                        _ => YEAR_FRAME,
                    });
                }
                for id in ids {
                    tag.set_text(id, year);
                }
            }
        }
    }
}

/// 기록할 ID3v2 버전. id3 크레이트는 v2.2를 쓸 수 없다.
pub fn write_version(tag: &id3::Tag) -> Version {
    match tag.version() {
        Version::Id3v22 => Version::Id3v23,
        version => version,
    }
}

pub fn normalize(value: &str) -> String {
    value
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

fn frame_text<'a>(tag: &'a id3::Tag, id: &str) -> Option<&'a str> {
    tag.get(id).and_then(|frame| frame.content().text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1(artist: &str, title: &str, year: &str) -> TagView {
        TagView::V1(Id3v1Tag {
            artist: artist.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_normalize_trims_spaces_newlines_nuls() {
        assert_eq!(normalize("  Help!\n\0\0"), "Help!");
        assert_eq!(normalize("\0"), "");
        assert_eq!(normalize("The  Beatles"), "The  Beatles");
    }

    #[test]
    fn test_v1_accessors() {
        let mut view = v1(" The Beatles\0", "Help! ", "1967");
        assert_eq!(view.version(), TagVersion::Id3v1);
        assert_eq!(view.artist(), "The Beatles");
        assert_eq!(view.title(), "Help!");
        assert_eq!(view.year(), "1967");

        view.set_year("1965");
        assert_eq!(view.year(), "1965");
        view.set_title("Yesterday");
        assert_eq!(view.title(), "Yesterday");
    }

    #[test]
    fn test_v2_absent_fields_read_empty() {
        let view = TagView::V2(id3::Tag::new());
        assert_eq!(view.artist(), "");
        assert_eq!(view.title(), "");
        assert_eq!(view.year(), "");
    }

    #[test]
    fn test_v2_year_from_tyer() {
        let mut tag = id3::Tag::new();
        tag.set_text("TYER", "1967\0");
        let mut view = TagView::V2(tag);
        assert_eq!(view.year(), "1967");

        view.set_year("1965");
        assert_eq!(view.year(), "1965");
    }

    #[test]
    fn test_v2_year_from_tdrc() {
        let mut tag = id3::Tag::with_version(Version::Id3v24);
        tag.set_text("TDRC", "1967-03-01");
        let view = TagView::V2(tag);
        assert_eq!(view.year(), "1967");
    }

    #[test]
    fn test_v2_set_year_without_frame_follows_version() {
        let mut view = TagView::V2(id3::Tag::with_version(Version::Id3v24));
        view.set_year("1965");
        match &view {
            TagView::V2(tag) => {
                assert!(tag.get("TDRC").is_some());
                assert!(tag.get("TYER").is_none());
            }
            TagView::V1(_) => unreachable!(),
        }
        assert_eq!(view.year(), "1965");

        let mut view = TagView::V2(id3::Tag::with_version(Version::Id3v23));
        view.set_year("1965");
        match &view {
            TagView::V2(tag) => assert!(tag.get("TYER").is_some()),
            TagView::V1(_) => unreachable!(),
        }
    }

    #[test]
    fn test_v2_artist_title() {
        let mut view = TagView::V2(id3::Tag::new());
        view.set_artist("The Beatles ");
        view.set_title("Help!");
        assert_eq!(view.artist(), "The Beatles");
        assert_eq!(view.title(), "Help!");
        assert_eq!(view.version(), TagVersion::Id3v2);
    }

    #[test]
    fn test_write_version_upgrades_v22() {
        let tag = id3::Tag::with_version(Version::Id3v22);
        assert_eq!(write_version(&tag), Version::Id3v23);
        let tag = id3::Tag::with_version(Version::Id3v24);
        assert_eq!(write_version(&tag), Version::Id3v24);
    }
}
