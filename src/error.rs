use thiserror::Error;

/// 외부 카탈로그 조회 실패. "후보 없음"과는 구분된다.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 태그 코덱 오류.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("no tag found")]
    NoTag,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tag: {0}")]
    Id3(id3::Error),
}
