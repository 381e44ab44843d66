//! The consumed audio output abstraction.
//!
//! Decoded samples go straight from the decode thread to a host-supplied
//! sink; the sink's own internal buffering is the last stage of timing
//! smoothing, so there is no queue on the audio path.

/// Error type for audio sink operations.
///
/// Sink failures are non-fatal to a session: playback continues silent.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("audio write failed: {0}")]
    Write(String),
}

/// Interleaved signed 16-bit little-endian PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// An output device the engine writes decoded samples into.
///
/// Lifecycle is `open` → any number of `write` → `drain` → `stop` → `close`,
/// in that order. The sink is touched only by the decode thread.
pub trait AudioSink: Send {
    fn open(&mut self, format: AudioFormat) -> Result<(), AudioError>;
    fn write(&mut self, bytes: &[u8]) -> Result<(), AudioError>;
    /// Blocks until queued samples have played out.
    fn drain(&mut self);
    fn stop(&mut self);
    fn close(&mut self);
}

/// Hands out a fresh, unopened sink per session.
pub trait AudioSinkProvider {
    fn open_sink(&mut self) -> Box<dyn AudioSink>;
}

/// A sink that discards everything. Used for video-only sessions and when
/// the real device could not be opened.
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn open(&mut self, _format: AudioFormat) -> Result<(), AudioError> {
        Ok(())
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), AudioError> {
        Ok(())
    }

    fn drain(&mut self) {}
    fn stop(&mut self) {}
    fn close(&mut self) {}
}
