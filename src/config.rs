use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_FLAG_FILENAME: &str = ".yearUpdated";
pub const DEFAULT_THROTTLE_MS: u64 = 100;
pub const DEFAULT_COLLECTION_KEYWORDS: &[&str] = &[
    "hits",
    "collection",
    "greatest",
    "best",
    "mix",
    "ultimate",
    "essential",
    "singles",
    "anthology",
    "sampler",
];

/// `~/.config/mp3-year-tagger/config.toml` 설정 파일. CLI 옵션이 우선한다.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 디렉토리 처리가 끝나면 만드는 표시 파일 이름. 빈 문자열이면 사용하지 않는다.
    pub flag_filename: String,
    /// 컬렉션 디렉토리를 나타내는 키워드 (소문자).
    pub collection_keywords: Vec<String>,
    /// 웹 API 요청 사이 대기 시간 (밀리초).
    pub web_api_throttle_ms: u64,
    pub musicbrainz: MusicBrainzConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flag_filename: DEFAULT_FLAG_FILENAME.to_string(),
            collection_keywords: DEFAULT_COLLECTION_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            web_api_throttle_ms: DEFAULT_THROTTLE_MS,
            musicbrainz: MusicBrainzConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MusicBrainzConfig {
    pub base_url: String,
    /// MusicBrainz는 User-Agent로 애플리케이션을 식별한다.
    pub user_agent: String,
    pub search_limit: Option<u32>,
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            base_url: "https://musicbrainz.org/ws/2".to_string(),
            user_agent: format!(
                "mp3-year-tagger/{} ( https://musicbrainz.org/doc/MusicBrainz_API )",
                env!("CARGO_PKG_VERSION")
            ),
            search_limit: None,
        }
    }
}

/// 실행 시 사용하는 옵션. 설정 파일 값에 CLI 옵션을 덮어쓴 결과.
#[derive(Debug, Clone)]
pub struct TaggerOptions {
    pub flag_filename: Option<String>,
    pub collection_keywords: Vec<String>,
    pub web_api_throttle_ms: u64,
    pub recursive: bool,
    pub dry_run: bool,
}

impl TaggerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            flag_filename: non_blank(&config.flag_filename),
            collection_keywords: normalize_keywords(&config.collection_keywords),
            web_api_throttle_ms: config.web_api_throttle_ms,
            recursive: false,
            dry_run: false,
        }
    }
}

impl Default for TaggerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 빈 문자열(공백만 있는 경우 포함)은 None.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 키워드를 소문자로 바꾸고 앞뒤 공백을 제거한다. 빈 항목은 버린다.
pub fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("mp3-year-tagger")
        .join("config.toml")
}

pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// 파일이 없거나 읽을 수 없으면 기본값을 사용한다.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}
