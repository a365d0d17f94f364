pub mod musicbrainz;

use crate::error::LookupError;
use crate::models::RecordingMatch;

/// 녹음 메타데이터 카탈로그 트레이트.
/// MusicBrainz 검색 클라이언트와 테스트용 가짜 카탈로그를 이 트레이트로 추상화한다.
pub trait RecordingCatalog {
    /// 카탈로그 이름 (메시지 출력용).
    fn name(&self) -> &str;
    /// 쿼리 문자열로 녹음을 검색한다. 관련도 점수와 릴리스 날짜를 포함한다.
    fn find_recordings(&self, query: &str) -> Result<Vec<RecordingMatch>, LookupError>;
}
