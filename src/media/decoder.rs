//! The consumed decoder abstraction.
//!
//! The engine never decodes anything itself; it drives a `MediaDecoder`
//! supplied by the host. `grab` hands back slices that borrow the decoder's
//! internal buffer, which is why the producer must copy into a
//! [`RawFrame`](crate::media::frame::RawFrame) before the next grab.

use crate::source::MediaSource;

/// Error type for decoder operations.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to open media source {0}: {1}")]
    Open(String, String),
    #[error("decode failed mid-stream: {0}")]
    Stream(String),
}

/// Stream properties probed when the decoder is opened.
#[derive(Debug, Clone, Copy)]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    /// Declared frame rate; may be 0, NaN or infinite for broken streams.
    pub frame_rate: f64,
    pub audio_channels: u16,
    pub sample_rate: u32,
}

impl MediaInfo {
    pub fn has_audio(&self) -> bool {
        self.audio_channels > 0
    }
}

/// Video payload of a decoded unit, borrowing the decoder's buffer.
#[derive(Debug, Clone, Copy)]
pub struct VideoData<'a> {
    /// BGR24 pixel bytes, `stride` bytes per row.
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes; non-positive when the decoder does not know it.
    pub stride: i32,
}

/// Audio payload of a decoded unit: interleaved 16-bit PCM bytes.
#[derive(Debug, Clone, Copy)]
pub struct AudioData<'a> {
    pub bytes: &'a [u8],
}

/// One decoded unit: a video frame, an audio block, or both, sharing a
/// media timestamp. A negative timestamp means the decoder does not know.
#[derive(Debug, Clone, Copy)]
pub struct DecodedUnit<'a> {
    pub timestamp_us: i64,
    pub video: Option<VideoData<'a>>,
    pub audio: Option<AudioData<'a>>,
}

/// A frame-producing decoder over an opened media source.
///
/// Implementations wrap whatever native library the host deploys; the
/// engine only pulls units and stops. Resource release happens on drop.
pub trait MediaDecoder: Send {
    /// Stream properties, valid immediately after open.
    fn info(&self) -> MediaInfo;

    /// Pulls the next decoded unit, or `None` at end of stream.
    ///
    /// The returned slices are only valid until the next call.
    fn grab(&mut self) -> Result<Option<DecodedUnit<'_>>, DecodeError>;

    /// Stops decoding. Called exactly once before the decoder is dropped.
    fn stop(&mut self);
}

/// Opens a decoder for a resolved media source.
pub trait DecoderOpener {
    fn open(&self, source: &MediaSource) -> Result<Box<dyn MediaDecoder>, DecodeError>;
}
