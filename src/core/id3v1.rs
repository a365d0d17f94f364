use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::TagError;

/// ID3v1 태그는 파일 끝 128바이트에 고정 레이아웃으로 저장된다.
pub const TAG_SIZE: u64 = 128;
const MAGIC: &[u8; 3] = b"TAG";

/// ID3v1 / ID3v1.1 태그.
/// id3 크레이트는 v1을 읽을 수만 있으므로 쓰기는 여기서 처리한다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub track: Option<u8>,
    pub genre: u8,
}

impl Id3v1Tag {
    /// 스트림 끝에서 태그를 읽는다. 태그가 없으면 `TagError::NoTag`.
    /// 읽기는 id3 크레이트에 맡긴다.
    pub fn read_from(mut reader: impl Read + Seek) -> Result<Self, TagError> {
        if !has_tag(&mut reader)? {
            return Err(TagError::NoTag);
        }
        let tag = id3::v1::Tag::read_from(reader).map_err(|e| match e.kind {
            id3::ErrorKind::NoTag => TagError::NoTag,
            _ => TagError::Id3(e),
        })?;
        Ok(Self::from(tag))
    }

    /// 기존 태그 자리에 덮어쓰고, 태그가 없으면 끝에 덧붙인다.
    pub fn write_to(&self, mut writer: impl Read + Write + Seek) -> Result<(), TagError> {
        let offset = if has_tag(&mut writer)? {
            SeekFrom::End(-(TAG_SIZE as i64))
        } else {
            SeekFrom::End(0)
        };
        writer.seek(offset)?;
        writer.write_all(&self.encode())?;
        writer.flush()?;
        Ok(())
    }

    fn encode(&self) -> [u8; TAG_SIZE as usize] {
        let mut buf = [0u8; TAG_SIZE as usize];
        buf[0..3].copy_from_slice(MAGIC);
        encode_field(&self.title, &mut buf[3..33]);
        encode_field(&self.artist, &mut buf[33..63]);
        encode_field(&self.album, &mut buf[63..93]);
        encode_field(&self.year, &mut buf[93..97]);
        match self.track {
            Some(track) => {
                encode_field(&self.comment, &mut buf[97..125]);
                buf[125] = 0;
                buf[126] = track;
            }
            None => encode_field(&self.comment, &mut buf[97..127]),
        }
        buf[127] = self.genre;
        buf
    }
}

impl From<id3::v1::Tag> for Id3v1Tag {
    fn from(tag: id3::v1::Tag) -> Self {
        Self {
            title: tag.title,
            artist: tag.artist,
            album: tag.album,
            year: tag.year,
            comment: tag.comment,
            track: tag.track,
            genre: tag.genre_id,
        }
    }
}

/// 끝 128바이트가 `TAG`로 시작하는지 확인한다.
fn has_tag(mut reader: impl Read + Seek) -> Result<bool, TagError> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < TAG_SIZE {
        return Ok(false);
    }
    reader.seek(SeekFrom::End(-(TAG_SIZE as i64)))?;
    let mut magic = [0u8; 3];
    reader.read_exact(&mut magic)?;
    Ok(&magic == MAGIC)
}

/// Latin-1로 기록한다. 범위 밖 문자는 `?`, 남는 자리는 NUL.
fn encode_field(value: &str, out: &mut [u8]) {
    for (slot, c) in out.iter_mut().zip(value.chars()) {
        *slot = u8::try_from(u32::from(c)).unwrap_or(b'?');
    }
}
