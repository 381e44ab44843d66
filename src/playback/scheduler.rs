//! Render-tick presentation scheduling.
//!
//! Runs cooperatively inside the host's render callback, never on its own
//! thread and never blocking. Each tick advances a frame-time accumulator
//! and consumes at most the frames needed to catch up to now, showing only
//! the newest of any backlog burst.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::media::frame::RawFrame;
use crate::playback::queue::FrameQueue;
use crate::render::surface::{fit_rect, DisplaySurface};
use crate::render::texture;

/// Frame duration used when the stream's declared rate is missing or
/// non-finite: 30 fps.
pub const FALLBACK_FRAME_DURATION: Duration = Duration::from_nanos(33_333_333);

/// Derives the per-frame display duration from a declared frame rate.
pub fn frame_duration_from_rate(frame_rate: f64) -> Duration {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Duration::from_nanos((1_000_000_000.0 / frame_rate) as u64)
    } else {
        FALLBACK_FRAME_DURATION
    }
}

/// Per-session presentation state driven once per render tick.
pub struct PresentationState {
    frame_duration: Duration,
    next_show: Option<Instant>,
    last_frame: Option<RawFrame>,
    video_width: u32,
    video_height: u32,
}

impl PresentationState {
    pub fn new(frame_rate: f64, video_width: u32, video_height: u32) -> Self {
        Self {
            frame_duration: frame_duration_from_rate(frame_rate),
            next_show: None,
            last_frame: None,
            video_width,
            video_height,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn last_frame(&self) -> Option<&RawFrame> {
        self.last_frame.as_ref()
    }

    /// One render tick: consume due frames, show the newest, redraw.
    ///
    /// The catch-up loop polls while the accumulator lags behind `now`,
    /// advancing it once per consumed frame; an empty queue ends the loop
    /// without advancing, so a stalled decode is retried next tick instead
    /// of spinning. Only the newest consumed frame is blitted and uploaded,
    /// which is what turns backlog into frame drops rather than delay.
    /// Worst case this does queue-capacity work; it never blocks.
    pub fn tick(&mut self, now: Instant, queue: &FrameQueue, surface: &mut dyn DisplaySurface) {
        let mut newest: Option<RawFrame> = None;
        let mut consumed = 0usize;

        match self.next_show {
            None => {
                // First tick: anything queued before presentation began is
                // already stale; keep only the newest and start the clock.
                while let Some(frame) = queue.poll() {
                    newest = Some(frame);
                    consumed += 1;
                }
                self.next_show = Some(now);
            }
            Some(ref mut next) => {
                while now >= *next {
                    match queue.poll() {
                        Some(frame) => {
                            newest = Some(frame);
                            consumed += 1;
                            *next += self.frame_duration;
                        }
                        None => break,
                    }
                }
            }
        }

        if consumed > 1 {
            debug!("presentation dropped {} stale frames", consumed - 1);
        }
        if let Some(frame) = newest {
            texture::blit_frame(&frame, surface);
            self.last_frame = Some(frame);
        }

        // The screen is repainted every tick regardless of frame cadence.
        let (sw, sh) = surface.surface_size();
        surface.draw(fit_rect(sw, sh, self.video_width, self.video_height));
    }
}
