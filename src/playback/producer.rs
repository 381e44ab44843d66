//! The decode-thread loop.
//!
//! Pulls units from the decoder, paces them against the shared clock
//! anchor, copies video into owned frames and pushes them through the
//! bounded queue, and writes audio to the sink. Runs until the stream
//! ends, a decode error occurs, or the session asks it to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::media::audio::AudioSink;
use crate::media::decoder::MediaDecoder;
use crate::media::frame::RawFrame;
use crate::playback::clock::ClockAnchor;
use crate::playback::queue::FrameQueue;

/// Runs the decode loop to completion. The producer owns the decoder and
/// the sink; both are released on this thread's exit path, so a teardown
/// that gives up on the join can never double-release them.
pub fn run(
    mut decoder: Box<dyn MediaDecoder>,
    queue: Arc<FrameQueue>,
    mut sink: Box<dyn AudioSink>,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
) {
    let mut anchor: Option<ClockAnchor> = None;
    let mut first_video_queued = false;
    let mut audio_ok = true;
    let mut frame_count: u64 = 0;

    loop {
        if !running.load(Ordering::Acquire) {
            debug!("decode loop interrupted by stop signal");
            break;
        }

        let unit = match decoder.grab() {
            Ok(Some(unit)) => unit,
            Ok(None) => {
                info!("stream finished after {} video frames", frame_count);
                break;
            }
            Err(e) => {
                // Fatal to this session only; never propagates as a panic.
                error!("decode error: {e}");
                break;
            }
        };

        // Anchor the clock at the first valid timestamp, then pace: a unit
        // ahead of schedule waits (bounded), a late unit goes through as-is.
        let ts = unit.timestamp_us;
        if ts >= 0 {
            let now = Instant::now();
            let a = *anchor.get_or_insert_with(|| ClockAnchor::set_at(now, ts));
            if let Some(delay) = a.pacing_delay(ts, now) {
                thread::sleep(delay);
            }
        }

        if let Some(video) = unit.video {
            let frame = RawFrame::copy_from(video.pixels, video.width, video.height, video.stride);
            // The sole backpressure point: a full queue stalls decoding
            // here. A false return means the queue was stopped under us.
            if !queue.push(frame) {
                debug!("frame rejected by stopped queue; exiting decode loop");
                break;
            }
            first_video_queued = true;
            frame_count += 1;
        }

        // Audio is gated behind the first queued video frame so no sound
        // plays before the picture is up; it shares the video's anchor.
        if first_video_queued && audio_ok {
            if let Some(audio) = unit.audio {
                if let (Some(a), true) = (anchor, ts >= 0) {
                    if let Some(delay) = a.pacing_delay(ts, Instant::now()) {
                        thread::sleep(delay);
                    }
                }
                if let Err(e) = sink.write(audio.bytes) {
                    warn!("audio write failed, continuing without audio: {e}");
                    audio_ok = false;
                }
            }
        }
    }

    decoder.stop();
    sink.drain();
    sink.stop();
    sink.close();
    finished.store(true, Ordering::Release);
}
