//! Bounded frame queue between the decode thread and the render thread.
//!
//! Capacity is fixed at 3. `push` blocks the producer when full, which is
//! the backpressure contract: decode can never outrun presentation by more
//! than the queue depth. `poll` never blocks so the render thread cannot
//! stall on it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::media::frame::RawFrame;

/// Fixed queue depth.
pub const QUEUE_CAPACITY: usize = 3;

/// A thread-safe FIFO of owned frames with blocking-put / non-blocking-poll
/// semantics. Frames move through by ownership transfer, so no frame is
/// ever visible to two owners at once.
pub struct FrameQueue {
    frames: Mutex<VecDeque<RawFrame>>,
    space_available: Condvar,
    stopped: AtomicBool,
    capacity: usize,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            space_available: Condvar::new(),
            stopped: AtomicBool::new(false),
            capacity,
        }
    }

    /// Enqueues a frame, blocking while the queue is at capacity.
    ///
    /// Returns `false` when the queue has been stopped; the caller must
    /// treat that as a stop request, not an error, and discard the frame.
    pub fn push(&self, frame: RawFrame) -> bool {
        let mut frames = self.frames.lock();
        while frames.len() >= self.capacity {
            if self.stopped.load(Ordering::Acquire) {
                return false;
            }
            self.space_available.wait(&mut frames);
        }
        if self.stopped.load(Ordering::Acquire) {
            return false;
        }
        frames.push_back(frame);
        true
    }

    /// Removes and returns the oldest frame. Never blocks.
    pub fn poll(&self) -> Option<RawFrame> {
        let mut frames = self.frames.lock();
        let frame = frames.pop_front();
        if frame.is_some() {
            self.space_available.notify_one();
        }
        frame
    }

    /// Marks the queue stopped and wakes any producer blocked in `push`.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.space_available.notify_all();
    }

    /// Drains and discards all frames. Only called during teardown, after
    /// the producer thread is no longer pushing.
    pub fn clear(&self) {
        self.frames.lock().clear();
        self.space_available.notify_all();
    }

    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}
