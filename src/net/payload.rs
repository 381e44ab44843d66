//! Wire codec for the "play this cutscene" request.
//!
//! The payload is a fixed 4-field record serialized in fixed order: a
//! u32-length-prefixed UTF-8 string, the source-type tag as an i32, and
//! two single-byte booleans. All integers big-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::source::SourceType;

/// Upper bound on the encoded path, bounding allocation on decode.
pub const MAX_PATH_LEN: usize = 32 * 1024;

/// Error type for payload decoding.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload truncated")]
    Truncated,
    #[error("path length {0} exceeds limit")]
    PathTooLong(usize),
    #[error("path is not valid utf-8")]
    InvalidUtf8,
    #[error("unknown source type tag {0}")]
    UnknownSourceType(i32),
}

/// A request to start playback, as carried over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub path: String,
    pub source_type: SourceType,
    pub disable_movement: bool,
    pub hide_hud: bool,
}

impl PlayRequest {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.path.len() + 10);
        buf.put_u32(self.path.len() as u32);
        buf.put_slice(self.path.as_bytes());
        buf.put_i32(self.source_type.tag());
        buf.put_u8(self.disable_movement as u8);
        buf.put_u8(self.hide_hud as u8);
        buf.freeze()
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, PayloadError> {
        if buf.remaining() < 4 {
            return Err(PayloadError::Truncated);
        }
        let len = buf.get_u32() as usize;
        if len > MAX_PATH_LEN {
            return Err(PayloadError::PathTooLong(len));
        }
        if buf.remaining() < len + 6 {
            return Err(PayloadError::Truncated);
        }

        let mut path = vec![0u8; len];
        buf.copy_to_slice(&mut path);
        let path = String::from_utf8(path).map_err(|_| PayloadError::InvalidUtf8)?;

        let tag = buf.get_i32();
        let source_type = SourceType::from_tag(tag).ok_or(PayloadError::UnknownSourceType(tag))?;

        let disable_movement = buf.get_u8() != 0;
        let hide_hud = buf.get_u8() != 0;

        Ok(Self {
            path,
            source_type,
            disable_movement,
            hide_hud,
        })
    }
}
