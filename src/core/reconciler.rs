use crate::core::tag_view::{TagVersion, TagView};
use crate::models::CanonicalTag;

/// 한 파일의 태그들을 병합한 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub canonical: CanonicalTag,
    /// 조회된 연도를 다시 기록할 태그들.
    pub targets: Vec<TagVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Unresolved,
    AlreadyCorrect,
    Update { year: i32 },
}

/// 파일에서 찾은 태그(0~2개)를 하나의 아티스트/제목/연도로 합친다.
///
/// 연도가 비어 있는 태그는 다른 태그에 연도가 있으면 병합에서 빠진다.
/// 둘 다 비어 있으면 ID3v2가 있을 때는 ID3v2만, 없으면 ID3v1이 대상이 된다.
/// 서로 다른 두 연도는 `"{v1} & {v2}"`가 되어 조회 결과와 절대 같지 않으므로 갱신된다.
/// 아티스트/제목은 ID3v2 값을 먼저 쓰고, 비어 있으면 ID3v1 값을 쓴다.
pub fn merge(views: &[TagView]) -> Option<Merged> {
    if views.is_empty() {
        return None;
    }

    let mut year_views: Vec<&TagView> = views.iter().filter(|view| !view.year().is_empty()).collect();
    if year_views.is_empty() {
        // 연도가 없으면 v2에만 기록
        let modern = views.iter().find(|view| view.version() == TagVersion::Id3v2);
        year_views.extend(modern.or_else(|| views.first()));
    }
    year_views.sort_by_key(|view| view.version() == TagVersion::Id3v2);

    let mut years: Vec<String> = Vec::new();
    for year in year_views.iter().map(|view| view.year()) {
        if !years.contains(&year) {
            years.push(year);
        }
    }

    let canonical = CanonicalTag {
        artist: preferred(views, TagView::artist),
        title: preferred(views, TagView::title),
        year: years.join(" & "),
    };

    Some(Merged {
        canonical,
        targets: year_views.iter().map(|view| view.version()).collect(),
    })
}

/// 저장된 연도와 조회된 연도를 비교한다.
pub fn decide(canonical: &CanonicalTag, resolved_year: Option<i32>) -> Decision {
    match resolved_year {
        None => Decision::Unresolved,
        Some(year) if canonical.year == year.to_string() => Decision::AlreadyCorrect,
        Some(year) => Decision::Update { year },
    }
}

/// 대상 태그마다 연도를 설정하고, 바꾼 개수를 반환한다.
pub fn apply_year(views: &mut [TagView], targets: &[TagVersion], year: i32) -> usize {
    let year = year.to_string();
    let mut changed = 0;
    for view in views.iter_mut().filter(|view| targets.contains(&view.version())) {
        view.set_year(&year);
        changed += 1;
    }
    changed
}

fn preferred(views: &[TagView], field: fn(&TagView) -> String) -> String {
    let modern = views
        .iter()
        .filter(|view| view.version() == TagVersion::Id3v2)
        .map(field)
        .find(|value| !value.is_empty());
    modern
        .or_else(|| views.iter().map(field).find(|value| !value.is_empty()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id3v1::Id3v1Tag;

    fn legacy(artist: &str, title: &str, year: &str) -> TagView {
        TagView::V1(Id3v1Tag {
            artist: artist.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            ..Default::default()
        })
    }

    fn modern(artist: &str, title: &str, year: &str) -> TagView {
        let mut view = TagView::V2(id3::Tag::new());
        if !artist.is_empty() {
            view.set_artist(artist);
        }
        if !title.is_empty() {
            view.set_title(title);
        }
        if !year.is_empty() {
            view.set_year(year);
        }
        view
    }

    #[test]
    fn test_no_views() {
        assert_eq!(merge(&[]), None);
    }

    #[test]
    fn test_differing_years_are_composite() {
        let views = [legacy("A", "T", "1967"), modern("A", "T", "1971")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.year, "1967 & 1971");
        assert_eq!(merged.targets, vec![TagVersion::Id3v1, TagVersion::Id3v2]);
    }

    #[test]
    fn test_composite_order_is_legacy_first() {
        let views = [modern("A", "T", "1971"), legacy("A", "T", "1967")];
        assert_eq!(merge(&views).unwrap().canonical.year, "1967 & 1971");
    }

    #[test]
    fn test_equal_years_are_not_composite() {
        let views = [legacy("A", "T", "1965"), modern("A", "T", "1965")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.year, "1965");
        assert_eq!(merged.targets.len(), 2);
    }

    #[test]
    fn test_single_year_carrier_excludes_other() {
        let views = [legacy("A", "T", " 1967\0"), modern("A", "T", "")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.year, "1967");
        assert_eq!(merged.targets, vec![TagVersion::Id3v1]);

        let views = [legacy("A", "T", ""), modern("A", "T", "1971")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.year, "1971");
        assert_eq!(merged.targets, vec![TagVersion::Id3v2]);
    }

    #[test]
    fn test_no_year_targets_modern_only() {
        let views = [legacy("A", "T", ""), modern("A", "T", "")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.year, "");
        assert_eq!(merged.targets, vec![TagVersion::Id3v2]);
    }

    #[test]
    fn test_no_year_legacy_alone_is_target() {
        let views = [legacy("A", "T", "")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.year, "");
        assert_eq!(merged.targets, vec![TagVersion::Id3v1]);
    }

    #[test]
    fn test_artist_title_prefer_modern_then_legacy() {
        let views = [legacy("Legacy", "Old Title", "1967"), modern("Modern", "", "")];
        let merged = merge(&views).unwrap();
        assert_eq!(merged.canonical.artist, "Modern");
        assert_eq!(merged.canonical.title, "Old Title");
    }

    #[test]
    fn test_missing_artist() {
        let views = [modern("", "Help!", "1965")];
        let merged = merge(&views).unwrap();
        assert!(!merged.canonical.has_artist_and_title());
    }

    #[test]
    fn test_decide() {
        let canonical = CanonicalTag {
            artist: "The Beatles".to_string(),
            title: "Help!".to_string(),
            year: "1967".to_string(),
        };
        assert_eq!(decide(&canonical, None), Decision::Unresolved);
        assert_eq!(decide(&canonical, Some(1967)), Decision::AlreadyCorrect);
        assert_eq!(decide(&canonical, Some(1965)), Decision::Update { year: 1965 });

        let composite = CanonicalTag {
            year: "1965 & 1967".to_string(),
            ..canonical
        };
        assert_eq!(decide(&composite, Some(1965)), Decision::Update { year: 1965 });
    }

    #[test]
    fn test_apply_year_only_touches_targets() {
        let mut views = vec![legacy("A", "T", "1967"), modern("A", "T", "")];
        let merged = merge(&views).unwrap();
        let changed = apply_year(&mut views, &merged.targets, 1965);
        assert_eq!(changed, 1);
        assert_eq!(views[0].year(), "1965");
        assert_eq!(views[1].year(), "");
    }
}
