use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::TaggerOptions;
use crate::core::tagger::FileTagger;
use crate::models::RunStats;
use crate::report::{self, Reporter};

/// 디렉토리를 순회하며 MP3 파일마다 연도 태그를 갱신한다.
/// 한 번에 파일 하나씩, 순서대로 처리한다.
pub struct Walker<'a> {
    tagger: FileTagger<'a>,
    reporter: &'a dyn Reporter,
    options: &'a TaggerOptions,
    stats: RunStats,
}

impl<'a> Walker<'a> {
    pub fn new(tagger: FileTagger<'a>, reporter: &'a dyn Reporter, options: &'a TaggerOptions) -> Self {
        Self {
            tagger,
            reporter,
            options,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// 이름에 컬렉션 키워드가 들어간 디렉토리를 모두 찾아 처리한다.
    /// 일치한 디렉토리 아래도 계속 내려가므로, 안쪽의 일치 디렉토리는 다시 처리될 수 있다.
    pub fn process_collections(&mut self, base: &Path) -> Result<usize> {
        if !base.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        if is_collection(base, &self.options.collection_keywords) {
            count += self.process_directory(base)?;
        }

        for subdirectory in list_subdirectories(base)? {
            count += self.process_collections(&subdirectory)?;
        }

        Ok(count)
    }

    /// 디렉토리 안의 MP3 파일을 처리하고, recursive면 하위 디렉토리로 내려간다.
    /// 표시 파일이 있으면 이 디렉토리의 파일은 건너뛴다.
    /// 처리(시도)한 파일 수를 반환한다.
    pub fn process_directory(&mut self, dir: &Path) -> Result<usize> {
        report::info(self.reporter, report::DETAIL, || {
            format!("Processing directory: \"{}\"", dir.display())
        });

        let flag_path = self
            .options
            .flag_filename
            .as_ref()
            .map(|name| dir.join(name));

        let mut count = 0;
        if flag_path.as_ref().is_some_and(|p| p.exists()) {
            report::info(self.reporter, report::DETAIL, || "    Already updated.".to_string());
        } else {
            for path in list_mp3_files(dir)? {
                let outcome = self.tagger.retag_file(&path)?;
                self.stats.record(&outcome);
                count += 1;

                if !self.options.dry_run {
                    thread::sleep(Duration::from_millis(self.options.web_api_throttle_ms));
                }
            }

            if let Some(flag_path) = flag_path.filter(|_| count > 0) {
                self.create_flag_file(&flag_path)?;
            }
        }

        if self.options.recursive {
            for subdirectory in list_subdirectories(dir)? {
                count += self.process_directory(&subdirectory)?;
            }
        }

        Ok(count)
    }

    fn create_flag_file(&mut self, flag_path: &Path) -> Result<()> {
        if self.options.dry_run {
            report::info(self.reporter, report::NORMAL, || {
                format!(
                    "    DRY RUN MODE: Would have created flag file: '{}'",
                    flag_path.display()
                )
            });
            return Ok(());
        }

        File::create(flag_path)
            .with_context(|| format!("could not create flag file {}", flag_path.display()))?;
        self.stats.flag_files_created += 1;
        tracing::debug!(path = %flag_path.display(), "created flag file");
        Ok(())
    }
}

/// 디렉토리 이름(소문자)에 키워드 중 하나가 들어 있는지 확인한다.
pub fn is_collection(dir: &Path, keywords: &[String]) -> bool {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase())
        .unwrap_or_default();
    keywords.iter().any(|keyword| name.contains(keyword.as_str()))
}

/// 확장자가 .mp3인지 확인한다 (대소문자 무시).
fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// 바로 아래의 MP3 파일 목록 (하위 디렉토리는 보지 않음). 경로 순으로 정렬.
fn list_mp3_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = list_entries(dir, |path| path.is_file() && is_mp3(path))?;
    files.sort();
    Ok(files)
}

fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = list_entries(dir, |path| path.is_dir())?;
    dirs.sort();
    Ok(dirs)
}

fn list_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("could not read {}", dir.display()))? {
        let path = entry?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    Ok(paths)
}
