//! Wall-clock anchoring of media timestamps.
//!
//! The anchor maps the stream's internal timestamp domain onto monotonic
//! wall time. It is fixed once, from the first unit carrying a valid
//! timestamp, and never reassigned for the lifetime of a session.

use std::time::{Duration, Instant};

/// Longest single pacing sleep. Bounds how late the producer notices a stop
/// request and how far one jittery timestamp can stall the pipeline.
pub const MAX_PACING_SLEEP: Duration = Duration::from_millis(30);

/// The mapping from media time to wall time, set at the first valid frame.
#[derive(Debug, Clone, Copy)]
pub struct ClockAnchor {
    start_wall: Instant,
    start_media_us: i64,
}

impl ClockAnchor {
    /// Anchors media time `media_us` to the wall-clock instant `now`.
    pub fn set_at(now: Instant, media_us: i64) -> Self {
        Self {
            start_wall: now,
            start_media_us: media_us,
        }
    }

    /// Media time of `timestamp_us` relative to the anchor.
    pub fn media_offset(&self, timestamp_us: i64) -> Duration {
        let us = timestamp_us.saturating_sub(self.start_media_us).max(0);
        Duration::from_micros(us as u64)
    }

    /// Wall time elapsed since the anchor was set.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start_wall)
    }

    /// How long the producer should sleep before handling a unit stamped
    /// `timestamp_us`, or `None` when the unit is on or behind schedule.
    ///
    /// Ahead-of-schedule units wait (capped at [`MAX_PACING_SLEEP`]);
    /// behind-schedule units go through immediately. Decode never skips to
    /// catch up, that is the presentation side's job.
    pub fn pacing_delay(&self, timestamp_us: i64, now: Instant) -> Option<Duration> {
        let offset = self.media_offset(timestamp_us);
        let elapsed = self.elapsed(now);
        if offset > elapsed {
            Some((offset - elapsed).min(MAX_PACING_SLEEP))
        } else {
            None
        }
    }
}
