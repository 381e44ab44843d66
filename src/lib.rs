//! Cutscene playback engine.
//!
//! Plays a video with synchronized audio inside a host application: a
//! decode thread pulls units from a host-supplied decoder, paces them
//! against a wall-clock anchor, and pushes owned frames through a bounded
//! queue; the host's render tick drives a non-blocking presentation
//! scheduler that shows each frame at the right moment and drops backlog
//! instead of falling behind. Audio streams straight to a host-supplied
//! sink against the same clock.
//!
//! The host provides three collaborators as trait objects — a
//! [`DecoderOpener`](media::DecoderOpener), a
//! [`SurfaceProvider`](render::SurfaceProvider) and an
//! [`AudioSinkProvider`](media::AudioSinkProvider) — and drives a
//! [`CutsceneController`](control::CutsceneController) from its render
//! loop.

pub mod control;
pub mod media;
pub mod net;
pub mod playback;
pub mod render;
pub mod source;

pub use control::{ControllerHandle, CutsceneController};
pub use media::{
    AudioError, AudioFormat, AudioSink, AudioSinkProvider, DecodeError, DecodedUnit,
    DecoderOpener, MediaDecoder, MediaInfo, NullAudioSink, RawFrame,
};
pub use net::{PayloadError, PlayRequest};
pub use playback::{FrameQueue, Session, SessionError, SessionState, QUEUE_CAPACITY};
pub use render::{fit_rect, DisplaySurface, DrawRect, SurfaceProvider};
pub use source::{resolve, MediaSource, SourceDirs, SourceError, SourceType};
