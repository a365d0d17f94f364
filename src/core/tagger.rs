use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::id3v1::Id3v1Tag;
use crate::core::reconciler::{self, Decision};
use crate::core::resolver::ReleaseDateResolver;
use crate::core::tag_view::{self, TagView};
use crate::models::FileOutcome;
use crate::report::{self, Reporter};

/// MP3 파일 하나의 연도 태그를 확인하고 필요하면 고친다.
pub struct FileTagger<'a> {
    resolver: ReleaseDateResolver<'a>,
    reporter: &'a dyn Reporter,
    dry_run: bool,
}

impl<'a> FileTagger<'a> {
    pub fn new(resolver: ReleaseDateResolver<'a>, reporter: &'a dyn Reporter, dry_run: bool) -> Self {
        Self {
            resolver,
            reporter,
            dry_run,
        }
    }

    /// 파일을 한 번 열어 두 태그 버전을 읽고, 발매 연도를 조회해 다시 기록한다.
    /// 드라이런이면 읽기 전용으로 열고 아무것도 쓰지 않는다.
    /// 파일 열기/쓰기 실패만 에러로 전파된다.
    pub fn retag_file(&self, path: &Path) -> Result<FileOutcome> {
        report::info(self.reporter, report::NORMAL, || format!("File: \"{}\"", path.display()));

        let mut file = OpenOptions::new()
            .read(true)
            .write(!self.dry_run)
            .open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        let mut views = self.read_views(&mut file);

        let merged = match reconciler::merge(&views) {
            Some(merged) => merged,
            None => {
                report::error(self.reporter, report::NORMAL, || {
                    "    No ID3 tags found. No changes.".to_string()
                });
                return Ok(FileOutcome::NoTags);
            }
        };
        let canonical = &merged.canonical;

        if !canonical.has_artist_and_title() {
            report::error(self.reporter, report::NORMAL, || {
                "    Title and/or artist tags are missing or contain empty values. No changes."
                    .to_string()
            });
            return Ok(FileOutcome::MissingArtistOrTitle);
        }

        report::info(self.reporter, report::DETAIL, || {
            format!("    Found MP3 Tags: {}", canonical.summary())
        });

        let resolved = match self
            .resolver
            .oldest_release_year(&canonical.artist, &canonical.title)
        {
            Ok(resolved) => resolved,
            Err(e) => {
                report::error(self.reporter, report::NORMAL, || {
                    format!("    Online lookup failed: {}. No changes.", e)
                });
                return Ok(FileOutcome::LookupFailed);
            }
        };

        let year = match reconciler::decide(canonical, resolved) {
            Decision::Unresolved => {
                report::error(self.reporter, report::NORMAL, || {
                    "    Oldest release date could not be determined. No changes.".to_string()
                });
                return Ok(FileOutcome::Unresolved);
            }
            Decision::AlreadyCorrect => {
                report::info(self.reporter, report::NORMAL, || {
                    "    Year is already correct. No changes.".to_string()
                });
                return Ok(FileOutcome::AlreadyCorrect);
            }
            Decision::Update { year } => year,
        };

        if self.dry_run {
            report::info(self.reporter, report::NORMAL, || {
                format!("    DRY RUN MODE: Year WOULD HAVE BEEN updated to ({}).", year)
            });
            return Ok(FileOutcome::WouldUpdate { year });
        }

        reconciler::apply_year(&mut views, &merged.targets, year);
        for view in views
            .iter()
            .filter(|view| merged.targets.contains(&view.version()))
        {
            write_view(&mut file, view)
                .with_context(|| format!("could not write tags to {}", path.display()))?;
        }

        report::info(self.reporter, report::NORMAL, || {
            format!("    Year updated to ({}).", year)
        });
        Ok(FileOutcome::Updated { year })
    }

    /// 각 태그 버전을 따로 읽는다. 읽기 실패는 해당 버전이 없는 것으로 본다.
    fn read_views(&self, file: &mut File) -> Vec<TagView> {
        let mut views = Vec::with_capacity(2);

        match Id3v1Tag::read_from(&mut *file) {
            Ok(tag) => views.push(TagView::V1(tag)),
            Err(e) => report::error(self.reporter, report::TRACE, || {
                format!("    Could not read ID3v1 tags: {}", e)
            }),
        }

        let v2 = file
            .seek(SeekFrom::Start(0))
            .map_err(id3::Error::from)
            .and_then(|_| id3::Tag::read_from2(&mut *file));
        match v2 {
            Ok(tag) => views.push(TagView::V2(tag)),
            Err(e) => report::error(self.reporter, report::TRACE, || {
                format!("    Could not read ID3v2 tags: {}", e)
            }),
        }

        views
    }
}

fn write_view(file: &mut File, view: &TagView) -> Result<()> {
    match view {
        TagView::V1(tag) => tag.write_to(&mut *file)?,
        TagView::V2(tag) => tag.write_to_file(&mut *file, tag_view::write_version(tag))?,
    }
    tracing::debug!(version = view.version().label(), year = %view.year(), "wrote tag");
    Ok(())
}
