use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use comfy_table::{Cell, Table};

use crate::config::{self, Config, TaggerOptions};
use crate::core::resolver::ReleaseDateResolver;
use crate::core::tagger::FileTagger;
use crate::core::walker::Walker;
use crate::models::RunStats;
use crate::report::{self, ConsoleReporter};
use crate::sources::musicbrainz::MusicBrainzClient;

#[derive(Parser, Debug)]
#[command(
    name = "mp3-year-tagger",
    version,
    about = "MusicBrainz에서 찾은 가장 이른 발매 연도로 MP3 ID3 연도 태그를 고친다"
)]
pub struct Cli {
    /// 처리할 MP3 파일이 있는 디렉토리
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// 컬렉션 디렉토리만 재귀적으로 처리 (--collection-keywords 참고)
    #[arg(short, long)]
    pub collections_only: bool,

    /// 파일을 바꾸지 않고 바뀔 내용만 출력
    #[arg(short, long)]
    pub dry_run: bool,

    /// 처리가 끝난 디렉토리에 만들 파일 이름, ""이면 만들지 않음 (기본값: .yearUpdated)
    #[arg(short, long, value_name = "NAME")]
    pub flag_filename: Option<String>,

    /// 컬렉션 디렉토리를 나타내는 키워드, 쉼표로 구분
    /// (기본값: hits, collection, greatest, best, mix, ultimate, essential, singles, anthology, sampler)
    #[arg(short = 'k', long, value_name = "CSV", value_delimiter = ',')]
    pub collection_keywords: Option<Vec<String>>,

    /// MusicBrainz 요청 사이 대기 시간, 밀리초 (기본값: 100)
    #[arg(short = 't', long, value_name = "MS")]
    pub web_api_throttle_ms: Option<u64>,

    /// 하위 디렉토리까지 처리
    #[arg(short, long)]
    pub recursive: bool,

    /// 출력 늘리기 (-vvv는 수준 3)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// 오류 외에는 출력하지 않음
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            report::QUIET
        } else {
            i8::try_from(self.verbose).unwrap_or(i8::MAX)
        }
    }

    /// 설정 파일 값 위에 CLI 옵션을 덮어쓴다.
    pub fn options(&self, config: &Config) -> TaggerOptions {
        let mut options = TaggerOptions::from_config(config);
        if let Some(ref name) = self.flag_filename {
            options.flag_filename = config::non_blank(name);
        }
        if let Some(ref keywords) = self.collection_keywords {
            options.collection_keywords = config::normalize_keywords(keywords);
        }
        if let Some(ms) = self.web_api_throttle_ms {
            options.web_api_throttle_ms = ms;
        }
        options.recursive = self.recursive;
        options.dry_run = self.dry_run;
        options
    }
}

pub fn run(cli: Cli) -> Result<RunStats> {
    if !cli.directory.is_dir() {
        bail!("Directory not found: {}", cli.directory.display());
    }

    let cfg = config::load_config();
    let options = cli.options(&cfg);
    let reporter = ConsoleReporter::new(cli.verbosity());
    let client = MusicBrainzClient::new(&cfg.musicbrainz)?;

    tracing::debug!(?options, "starting");

    let resolver = ReleaseDateResolver::new(&client, &reporter);
    let tagger = FileTagger::new(resolver, &reporter, options.dry_run);
    let mut walker = Walker::new(tagger, &reporter, &options);

    if cli.collections_only {
        walker.process_collections(&cli.directory)?;
    } else {
        walker.process_directory(&cli.directory)?;
    }

    let stats = walker.stats().clone();
    if !cli.quiet {
        print_summary(&stats, options.dry_run);
    }
    Ok(stats)
}

fn print_summary(stats: &RunStats, dry_run: bool) {
    let updated_label = if dry_run { "Would update" } else { "Updated" };

    let mut table = Table::new();
    table.set_header(vec!["Result", "Files"]);
    for (label, count) in [
        (updated_label, stats.updated),
        ("Already correct", stats.already_correct),
        ("Not determined", stats.unresolved),
        ("Lookup failed", stats.lookup_failed),
        ("Missing artist/title", stats.missing_fields),
        ("No ID3 tags", stats.no_tags),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }

    println!("\n{table}");
    println!("Processed {} files.", stats.processed);
    if stats.flag_files_created > 0 {
        println!("Created {} flag files.", stats.flag_files_created);
    }
}
