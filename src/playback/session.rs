//! Playback session lifecycle.
//!
//! A `Session` owns the frame queue, the decode thread, and the display
//! surface, and guarantees race-free, idempotent teardown: stop and
//! natural completion can arrive on different threads in any order without
//! double-releasing anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::media::audio::{AudioFormat, AudioSink, NullAudioSink};
use crate::media::decoder::{DecodeError, DecoderOpener, MediaInfo};
use crate::playback::producer;
use crate::playback::queue::FrameQueue;
use crate::playback::scheduler::PresentationState;
use crate::playback::state::SessionState;
use crate::render::surface::{DisplaySurface, SurfaceProvider};
use crate::render::texture;
use crate::source::{MediaSource, SourceError};

/// How long teardown waits for the decode thread before detaching it.
const JOIN_TIMEOUT: Duration = Duration::from_millis(1000);

/// Error type for session setup. Playback errors after `Playing` never
/// surface here; they end the session through the `Finished` state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("decoder error: {0}")]
    Decode(#[from] DecodeError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("thread error: {0}")]
    Thread(String),
}

/// One playback session: decode thread, bounded queue, presentation state
/// and the display surface, with a fixed-order teardown.
pub struct Session {
    state: SessionState,
    info: MediaInfo,
    queue: Arc<FrameQueue>,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    producer: Option<thread::JoinHandle<()>>,
    surface: Option<Box<dyn DisplaySurface>>,
    presentation: PresentationState,
}

impl Session {
    /// Opens the source and starts playback.
    ///
    /// Probes the stream, allocates a video-sized image painted black,
    /// opens the audio sink when the stream has audio (open failure keeps
    /// the session, silent), then spawns the decode thread. Fatal errors
    /// here mean no session and no thread was created.
    pub fn start(
        source: &MediaSource,
        opener: &dyn DecoderOpener,
        surfaces: &mut dyn SurfaceProvider,
        mut sink: Box<dyn AudioSink>,
    ) -> Result<Self, SessionError> {
        let decoder = opener.open(source)?;
        let info = decoder.info();
        info!(
            "video info: {}x{} @ {}fps, {} audio channels @ {}Hz",
            info.width, info.height, info.frame_rate, info.audio_channels, info.sample_rate
        );

        let mut surface = surfaces.create_image(info.width, info.height);
        texture::fill_black(&mut *surface);

        let sink: Box<dyn AudioSink> = if info.has_audio() {
            let format = AudioFormat {
                sample_rate: info.sample_rate,
                channels: info.audio_channels,
            };
            match sink.open(format) {
                Ok(()) => sink,
                Err(e) => {
                    warn!("audio sink open failed, playing without audio: {e}");
                    Box::new(NullAudioSink)
                }
            }
        } else {
            Box::new(NullAudioSink)
        };

        let queue = Arc::new(FrameQueue::new());
        let running = Arc::new(AtomicBool::new(true));
        let finished = Arc::new(AtomicBool::new(false));

        let producer = thread::Builder::new()
            .name("cutscene-decode".into())
            .spawn({
                let queue = Arc::clone(&queue);
                let running = Arc::clone(&running);
                let finished = Arc::clone(&finished);
                move || producer::run(decoder, queue, sink, running, finished)
            })
            .map_err(|e| SessionError::Thread(e.to_string()))?;

        Ok(Self {
            state: SessionState::Playing,
            info,
            queue,
            running,
            finished,
            producer: Some(producer),
            surface: Some(surface),
            presentation: PresentationState::new(info.frame_rate, info.width, info.height),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn info(&self) -> MediaInfo {
        self.info
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Drives presentation for one host render tick. Never blocks.
    ///
    /// When the decode thread has marked the stream finished, this is
    /// where the render thread observes it and triggers teardown.
    pub fn render_tick(&mut self, now: Instant) {
        if self.state != SessionState::Playing {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            self.presentation.tick(now, &self.queue, &mut **surface);
        }
        if self.finished.load(Ordering::Acquire) && self.queue.is_empty() {
            self.state = SessionState::Finished;
            self.teardown();
        }
    }

    /// External stop request. Safe to call from any state, any number of
    /// times; second and later calls are no-ops.
    pub fn stop(&mut self) {
        if self.state.is_closed() {
            return;
        }
        if self.state == SessionState::Playing {
            self.state = SessionState::Stopped;
        }
        self.teardown();
    }

    /// Releases everything in fixed order and moves to `Closed`.
    ///
    /// Order: signal the decode thread and wake it out of a blocked push,
    /// join with a bounded timeout (the thread releases decoder and sink
    /// on its own exit path), destroy the surface, clear the queue. All
    /// resources live in `Option`s taken exactly once, so running this
    /// twice cannot double-release.
    fn teardown(&mut self) {
        self.running.store(false, Ordering::Release);
        self.queue.stop();

        if let Some(handle) = self.producer.take() {
            let deadline = Instant::now() + JOIN_TIMEOUT;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                // Proceed with release regardless; the thread cleans up the
                // decoder and sink itself whenever it finally exits.
                warn!("decode thread did not exit within {:?}, detaching", JOIN_TIMEOUT);
            }
        }

        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
        self.queue.clear();
        self.state = SessionState::Closed;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
